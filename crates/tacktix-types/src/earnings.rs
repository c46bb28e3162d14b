//! Platform earnings records.
//!
//! One record per completed payout, never mutated afterwards. Together
//! with the PLATFORM_FEE transactions these drive the ledger audit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, MatchId};

/// The platform's fee share of one completed match payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformEarnings {
    pub match_id: MatchId,
    pub amount: Amount,
    pub recorded_at: DateTime<Utc>,
}

impl PlatformEarnings {
    #[must_use]
    pub fn new(match_id: MatchId, amount: Amount) -> Self {
        Self {
            match_id,
            amount,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip() {
        let e = PlatformEarnings::new(MatchId::new(), Amount::from_minor(200));
        let json = serde_json::to_string(&e).unwrap();
        let back: PlatformEarnings = serde_json::from_str(&json).unwrap();
        assert_eq!(e, back);
    }
}
