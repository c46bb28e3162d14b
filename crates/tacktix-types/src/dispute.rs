//! Dispute records and the dispute status state machine.
//!
//! Transitions are one-directional and performed only by moderators.
//! Resolution changes money (it completes or voids the match), so it is
//! reachable only through INVESTIGATING; dismissal is allowed straight
//! from OPEN for frivolous reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DisputeId, MatchId, UserId};

/// Lifecycle status of a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeStatus {
    Open,
    Investigating,
    Resolved,
    Dismissed,
}

impl DisputeStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }

    /// `Open -> {Investigating, Dismissed}`,
    /// `Investigating -> {Resolved, Dismissed}`. Terminal states absorb.
    ///
    /// Dismissal straight from OPEN is deliberate: a frivolous report
    /// needs no investigation, while RESOLVED moves money and is only
    /// reachable through INVESTIGATING.
    #[must_use]
    pub fn can_transition_to(self, to: DisputeStatus) -> bool {
        match self {
            Self::Open => matches!(to, Self::Investigating | Self::Dismissed),
            Self::Investigating => matches!(to, Self::Resolved | Self::Dismissed),
            Self::Resolved | Self::Dismissed => false,
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Investigating => write!(f, "INVESTIGATING"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Dismissed => write!(f, "DISMISSED"),
        }
    }
}

/// A formal report requiring moderator adjudication of a match outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub match_id: MatchId,
    pub reported_by: UserId,
    pub reason: String,
    pub description: String,
    pub status: DisputeStatus,
    pub created_at: DateTime<Utc>,
}

impl Dispute {
    #[must_use]
    pub fn open(
        match_id: MatchId,
        reported_by: UserId,
        reason: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: DisputeId::new(),
            match_id,
            reported_by,
            reason: reason.into(),
            description: description.into(),
            status: DisputeStatus::Open,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_transitions() {
        let s = DisputeStatus::Open;
        assert!(s.can_transition_to(DisputeStatus::Investigating));
        assert!(s.can_transition_to(DisputeStatus::Dismissed));
        assert!(
            !s.can_transition_to(DisputeStatus::Resolved),
            "resolution requires investigation first"
        );
    }

    #[test]
    fn investigating_transitions() {
        let s = DisputeStatus::Investigating;
        assert!(s.can_transition_to(DisputeStatus::Resolved));
        assert!(s.can_transition_to(DisputeStatus::Dismissed));
        assert!(!s.can_transition_to(DisputeStatus::Open));
    }

    #[test]
    fn terminal_statuses_absorb() {
        for s in [DisputeStatus::Resolved, DisputeStatus::Dismissed] {
            assert!(s.is_terminal());
            for to in [
                DisputeStatus::Open,
                DisputeStatus::Investigating,
                DisputeStatus::Resolved,
                DisputeStatus::Dismissed,
            ] {
                assert!(!s.can_transition_to(to), "{s} -> {to} must be blocked");
            }
        }
    }

    #[test]
    fn new_dispute_is_open() {
        let d = Dispute::open(MatchId::new(), UserId::new(), "wrong score", "see proof");
        assert_eq!(d.status, DisputeStatus::Open);
        assert_eq!(d.reason, "wrong score");
    }
}
