//! # tacktix-payout
//!
//! **Payout Engine**: fee computation and exactly-once match payouts.
//!
//! ## Architecture
//!
//! A completed match with a resolved winner is handed to the engine, which:
//! 1. Validates the prize and splits it with [`FeePolicy`]
//! 2. Answers obvious retries from a bounded in-process cache of
//!    recently paid matches
//! 3. Commits the payout atomically through the ledger store — winner
//!    credit, MATCH_WINNINGS and PLATFORM_FEE entries, earnings row
//! 4. Treats a store-level conflict as "a concurrent payout already won"
//!    and reports it as a successful no-op
//!
//! The authoritative at-most-once guarantee is the store's unique
//! constraint on (match, MATCH_WINNINGS); the cache only saves a round
//! trip on obvious duplicates.

pub mod engine;
pub mod fees;
pub mod receipt;

pub use engine::{PayoutEngine, PayoutOutcome};
pub use fees::{FeePolicy, FeeSplit};
pub use receipt::PayoutReceipt;
