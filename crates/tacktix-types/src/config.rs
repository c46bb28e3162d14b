//! Configuration for the ledger and workflow services.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunable knobs for the ledger, payout engine, and workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Platform fee in basis points of the prize (1000 = 10%).
    pub fee_bps: u32,
    /// Per-artifact evidence size ceiling in bytes.
    pub max_evidence_bytes: usize,
    /// In-process payout idempotency cache size.
    pub payout_cache_size: usize,
    /// Apply a match outcome automatically when both participants'
    /// latest submissions agree. Off by default: moderator action is the
    /// confirmed trigger for payout.
    pub auto_reconcile: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fee_bps: constants::DEFAULT_FEE_BPS,
            max_evidence_bytes: constants::MAX_EVIDENCE_BYTES,
            payout_cache_size: constants::PAYOUT_IDEMPOTENCY_CACHE_SIZE,
            auto_reconcile: false,
        }
    }
}
