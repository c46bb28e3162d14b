//! Transaction log entries.
//!
//! The log is append-only: corrections are new transactions, never edits.
//! Only deposits and withdrawals move through a status lifecycle; every
//! other kind is written COMPLETED and is immutable from birth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Amount, MatchId, TransactionId, UserId};

/// The kind of balance-affecting event a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Funds entering the platform from an external source.
    Deposit,
    /// Funds leaving the platform. Debited when requested, refunded if rejected.
    Withdrawal,
    /// A stake debited when a player enters a match.
    Bet,
    /// The winner's net prize credit for a completed match.
    MatchWinnings,
    /// The platform's fee share of a prize. Pot-side, not a wallet movement.
    PlatformFee,
    /// A stake returned to a player (cancelled or voided match).
    Refund,
}

/// Which way a transaction moves the owner's wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
    /// Accounted against the prize pot, not any user wallet.
    PotSide,
}

impl TransactionKind {
    /// The wallet-movement direction of this kind. Used by the ledger audit
    /// to rebuild the expected wallet total from the log.
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::Deposit | Self::MatchWinnings | Self::Refund => Direction::Credit,
            Self::Withdrawal | Self::Bet => Direction::Debit,
            Self::PlatformFee => Direction::PotSide,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdrawal => write!(f, "WITHDRAWAL"),
            Self::Bet => write!(f, "BET"),
            Self::MatchWinnings => write!(f, "MATCH_WINNINGS"),
            Self::PlatformFee => write!(f, "PLATFORM_FEE"),
            Self::Refund => write!(f, "REFUND"),
        }
    }
}

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    PendingVerification,
    Completed,
    Rejected,
}

impl TransactionStatus {
    /// Whether this status ends the lifecycle. Final entries are immutable.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Lifecycle: `Pending -> {PendingVerification, Completed, Rejected}`,
    /// `PendingVerification -> {Completed, Rejected}`. Final states absorb.
    #[must_use]
    pub fn can_transition_to(self, to: TransactionStatus) -> bool {
        match self {
            Self::Pending => matches!(
                to,
                Self::PendingVerification | Self::Completed | Self::Rejected
            ),
            Self::PendingVerification => matches!(to, Self::Completed | Self::Rejected),
            Self::Completed | Self::Rejected => false,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::PendingVerification => write!(f, "PENDING_VERIFICATION"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// One append-only ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub kind: TransactionKind,
    /// Always positive; the direction is implied by `kind`.
    pub amount: Amount,
    pub status: TransactionStatus,
    pub match_id: Option<MatchId>,
    pub created_at: DateTime<Utc>,
    pub description: String,
}

impl Transaction {
    /// A new entry starting in PENDING (deposits and withdrawal requests).
    #[must_use]
    pub fn pending(
        user_id: UserId,
        kind: TransactionKind,
        amount: Amount,
        match_id: Option<MatchId>,
        description: impl Into<String>,
    ) -> Self {
        Self::with_status(
            user_id,
            kind,
            amount,
            TransactionStatus::Pending,
            match_id,
            description,
        )
    }

    /// A new entry written COMPLETED at birth (bets, winnings, fees, refunds).
    #[must_use]
    pub fn completed(
        user_id: UserId,
        kind: TransactionKind,
        amount: Amount,
        match_id: Option<MatchId>,
        description: impl Into<String>,
    ) -> Self {
        Self::with_status(
            user_id,
            kind,
            amount,
            TransactionStatus::Completed,
            match_id,
            description,
        )
    }

    fn with_status(
        user_id: UserId,
        kind: TransactionKind,
        amount: Amount,
        status: TransactionStatus,
        match_id: Option<MatchId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            kind,
            amount,
            status,
            match_id,
            created_at: Utc::now(),
            description: description.into(),
        }
    }

    /// Whether this entry may never change again.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.status.is_final()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_from_pending() {
        let s = TransactionStatus::Pending;
        assert!(s.can_transition_to(TransactionStatus::PendingVerification));
        assert!(s.can_transition_to(TransactionStatus::Completed));
        assert!(s.can_transition_to(TransactionStatus::Rejected));
    }

    #[test]
    fn lifecycle_from_pending_verification() {
        let s = TransactionStatus::PendingVerification;
        assert!(!s.can_transition_to(TransactionStatus::Pending));
        assert!(s.can_transition_to(TransactionStatus::Completed));
        assert!(s.can_transition_to(TransactionStatus::Rejected));
    }

    #[test]
    fn final_statuses_absorb() {
        for s in [TransactionStatus::Completed, TransactionStatus::Rejected] {
            assert!(s.is_final());
            for to in [
                TransactionStatus::Pending,
                TransactionStatus::PendingVerification,
                TransactionStatus::Completed,
                TransactionStatus::Rejected,
            ] {
                assert!(!s.can_transition_to(to), "{s} -> {to} must be blocked");
            }
        }
    }

    #[test]
    fn kind_directions() {
        assert_eq!(TransactionKind::Deposit.direction(), Direction::Credit);
        assert_eq!(TransactionKind::Withdrawal.direction(), Direction::Debit);
        assert_eq!(TransactionKind::Bet.direction(), Direction::Debit);
        assert_eq!(
            TransactionKind::MatchWinnings.direction(),
            Direction::Credit
        );
        assert_eq!(TransactionKind::Refund.direction(), Direction::Credit);
        assert_eq!(TransactionKind::PlatformFee.direction(), Direction::PotSide);
    }

    #[test]
    fn constructors_set_status() {
        let user = UserId::new();
        let tx = Transaction::pending(
            user,
            TransactionKind::Deposit,
            Amount::from_minor(500),
            None,
            "card deposit",
        );
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert!(!tx.is_final());

        let tx = Transaction::completed(
            user,
            TransactionKind::Bet,
            Amount::from_minor(500),
            Some(MatchId::new()),
            "match stake",
        );
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert!(tx.is_final());
    }

    #[test]
    fn serde_roundtrip() {
        let tx = Transaction::completed(
            UserId::new(),
            TransactionKind::MatchWinnings,
            Amount::from_minor(1_800),
            Some(MatchId::new()),
            "match winnings",
        );
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx.id, back.id);
        assert_eq!(tx.kind, back.kind);
        assert_eq!(tx.amount, back.amount);
        assert_eq!(tx.match_id, back.match_id);
    }
}
