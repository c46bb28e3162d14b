//! Match records and the match status state machine.
//!
//! Status transitions are monotonic: a completed or cancelled match can
//! never be resurrected, and `winner_id` is set if and only if the match
//! is COMPLETED.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, MatchId, UserId};

/// Lifecycle status of a match.
///
/// `Pending -> Active -> {Completed, Disputed, Cancelled}`,
/// `Disputed -> {Completed, Cancelled}`. COMPLETED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Pending,
    Active,
    Completed,
    Disputed,
    Cancelled,
}

impl MatchStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    #[must_use]
    pub fn can_transition_to(self, to: MatchStatus) -> bool {
        match self {
            Self::Pending => matches!(to, Self::Active | Self::Cancelled),
            Self::Active => matches!(to, Self::Completed | Self::Disputed | Self::Cancelled),
            Self::Disputed => matches!(to, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A wagering match between a host and (once joined) an opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub host_id: UserId,
    /// `None` until an opponent joins.
    pub opponent_id: Option<UserId>,
    /// The stake each participant puts up; also the winner's prize amount.
    pub bet_amount: Amount,
    pub status: MatchStatus,
    /// Set if and only if `status == Completed`.
    pub winner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// A freshly created challenge awaiting an opponent.
    #[must_use]
    pub fn new(host_id: UserId, bet_amount: Amount) -> Self {
        Self {
            id: MatchId::new(),
            host_id,
            opponent_id: None,
            bet_amount,
            status: MatchStatus::Pending,
            winner_id: None,
            created_at: Utc::now(),
        }
    }

    /// Whether `user` is the host or the joined opponent.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.host_id == user || self.opponent_id == Some(user)
    }

    /// Host plus opponent, if joined.
    #[must_use]
    pub fn participants(&self) -> Vec<UserId> {
        let mut users = vec![self.host_id];
        if let Some(opponent) = self.opponent_id {
            users.push(opponent);
        }
        users
    }

    /// The prize the winner is paid out of: the loser's stake. The winner's
    /// own stake is returned separately as a refund, so the fee applies
    /// only to actual winnings.
    #[must_use]
    pub fn prize_amount(&self) -> Amount {
        self.bet_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions() {
        let s = MatchStatus::Pending;
        assert!(s.can_transition_to(MatchStatus::Active));
        assert!(s.can_transition_to(MatchStatus::Cancelled));
        assert!(!s.can_transition_to(MatchStatus::Completed));
        assert!(!s.can_transition_to(MatchStatus::Disputed));
    }

    #[test]
    fn active_transitions() {
        let s = MatchStatus::Active;
        assert!(s.can_transition_to(MatchStatus::Completed));
        assert!(s.can_transition_to(MatchStatus::Disputed));
        assert!(s.can_transition_to(MatchStatus::Cancelled));
        assert!(!s.can_transition_to(MatchStatus::Pending));
    }

    #[test]
    fn disputed_must_end_completed_or_cancelled() {
        let s = MatchStatus::Disputed;
        assert!(s.can_transition_to(MatchStatus::Completed));
        assert!(s.can_transition_to(MatchStatus::Cancelled));
        assert!(!s.can_transition_to(MatchStatus::Active));
    }

    #[test]
    fn terminal_statuses_absorb() {
        for s in [MatchStatus::Completed, MatchStatus::Cancelled] {
            assert!(s.is_terminal());
            for to in [
                MatchStatus::Pending,
                MatchStatus::Active,
                MatchStatus::Completed,
                MatchStatus::Disputed,
                MatchStatus::Cancelled,
            ] {
                assert!(!s.can_transition_to(to), "{s} -> {to} must be blocked");
            }
        }
    }

    #[test]
    fn participants_tracks_join() {
        let host = UserId::new();
        let mut m = Match::new(host, Amount::from_minor(2_000));
        assert!(m.is_participant(host));
        assert_eq!(m.participants(), vec![host]);

        let opponent = UserId::new();
        assert!(!m.is_participant(opponent));
        m.opponent_id = Some(opponent);
        assert!(m.is_participant(opponent));
        assert_eq!(m.participants().len(), 2);
    }

    #[test]
    fn new_match_is_pending_without_winner() {
        let m = Match::new(UserId::new(), Amount::from_minor(500));
        assert_eq!(m.status, MatchStatus::Pending);
        assert!(m.winner_id.is_none());
        assert!(m.opponent_id.is_none());
        assert_eq!(m.prize_amount(), Amount::from_minor(500));
    }
}
