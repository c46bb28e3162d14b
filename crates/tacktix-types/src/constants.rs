//! System-wide constants for the TacktixEdge ledger service.

/// Minor units per major currency unit (cents per dollar).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Basis-point scale: `10_000` bps == 100%.
pub const BPS_SCALE: u32 = 10_000;

/// Default platform fee in basis points (1000 bps == 10% of the prize).
pub const DEFAULT_FEE_BPS: u32 = 1_000;

/// Maximum size of a single evidence artifact in bytes (5 MiB).
pub const MAX_EVIDENCE_BYTES: usize = 5 * 1024 * 1024;

/// Payout idempotency cache size (number of match IDs to remember).
pub const PAYOUT_IDEMPOTENCY_CACHE_SIZE: usize = 100_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name.
pub const SERVICE_NAME: &str = "TacktixEdge";
