//! Payout receipts.
//!
//! A receipt records exactly what one applied payout did, for callers and
//! for the audit trail surfaced to UI layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tacktix_types::{Amount, MatchId, UserId};

/// Proof of one applied payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    pub match_id: MatchId,
    pub winner: UserId,
    /// Prize pool before the fee.
    pub prize: Amount,
    /// Platform's share.
    pub fee: Amount,
    /// Winner's credit. `fee + net == prize`.
    pub net: Amount,
    pub paid_at: DateTime<Utc>,
}
