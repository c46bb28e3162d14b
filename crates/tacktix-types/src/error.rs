//! Error types for the TacktixEdge ledger service.
//!
//! All errors use the `TE_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Wallet / balance errors
//! - 2xx: Transaction log errors
//! - 3xx: Payout errors
//! - 4xx: Match / workflow errors
//! - 5xx: Dispute errors
//! - 6xx: Evidence errors
//! - 9xx: General / upstream errors

use thiserror::Error;

use crate::{
    Amount, DisputeId, DisputeStatus, MatchId, MatchStatus, TransactionId, TransactionStatus,
    UserId,
};

/// Central error enum for all ledger and workflow operations.
#[derive(Debug, Error)]
pub enum TacktixError {
    // =================================================================
    // Wallet / Balance Errors (1xx)
    // =================================================================
    /// A debit would drive the wallet below zero. The wallet is unchanged.
    #[error("TE_ERR_100: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    /// A negative or non-positive amount where a positive one is required.
    #[error("TE_ERR_101: Invalid amount: {amount}")]
    InvalidAmount { amount: Amount },

    /// A balance operation overflowed the minor-unit representation.
    #[error("TE_ERR_102: Balance overflow for user {0}")]
    BalanceOverflow(UserId),

    // =================================================================
    // Transaction Log Errors (2xx)
    // =================================================================
    /// The referenced transaction does not exist.
    #[error("TE_ERR_200: Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// The requested status change is not part of the transaction lifecycle.
    #[error("TE_ERR_201: Invalid transaction status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    /// The transaction is already COMPLETED or REJECTED and is immutable.
    #[error("TE_ERR_202: Transaction already final: {0}")]
    TransactionFinal(TransactionId),

    // =================================================================
    // Payout Errors (3xx)
    // =================================================================
    /// A concurrent mutation won the race. Callers treat this as success
    /// for payouts and stake refunds.
    #[error("TE_ERR_301: Persistence conflict: {reason}")]
    PersistenceConflict { reason: String },

    /// The match has no resolved winner, so there is nothing to pay out.
    #[error("TE_ERR_302: Match {0} has no resolved winner")]
    UnresolvedWinner(MatchId),

    // =================================================================
    // Match / Workflow Errors (4xx)
    // =================================================================
    /// The referenced match does not exist.
    #[error("TE_ERR_400: Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Match statuses are monotonic; this transition is not allowed.
    #[error("TE_ERR_401: Invalid match transition: {from} -> {to}")]
    InvalidMatchTransition {
        from: MatchStatus,
        to: MatchStatus,
    },

    /// The acting user is not the host or opponent of the match.
    #[error("TE_ERR_402: User {user} is not a participant of match {match_id}")]
    NotAParticipant { user: UserId, match_id: MatchId },

    /// The match already has an opponent.
    #[error("TE_ERR_403: Match already full: {0}")]
    MatchFull(MatchId),

    /// A host cannot join their own match.
    #[error("TE_ERR_404: Host cannot join own match: {0}")]
    SelfChallenge(MatchId),

    // =================================================================
    // Dispute Errors (5xx)
    // =================================================================
    /// The referenced dispute does not exist.
    #[error("TE_ERR_500: Dispute not found: {0}")]
    DisputeNotFound(DisputeId),

    /// Dispute statuses are one-directional; this transition is not allowed.
    #[error("TE_ERR_501: Invalid dispute transition: {from} -> {to}")]
    InvalidDisputeTransition {
        from: DisputeStatus,
        to: DisputeStatus,
    },

    /// The acting identity lacks the required role (moderator).
    #[error("TE_ERR_502: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// A dispute is already open for this match.
    #[error("TE_ERR_503: Dispute already open for match {0}")]
    DisputeAlreadyOpen(MatchId),

    // =================================================================
    // Evidence Errors (6xx)
    // =================================================================
    /// A result submission must carry at least one proof artifact.
    #[error("TE_ERR_600: Result submission carries no evidence")]
    MissingEvidence,

    /// A single evidence artifact exceeds the size ceiling.
    #[error("TE_ERR_601: Evidence artifact too large: {size} bytes (limit {limit})")]
    EvidenceTooLarge { size: usize, limit: usize },

    // =================================================================
    // General / Upstream (9xx)
    // =================================================================
    /// Bad input shape or range.
    #[error("TE_ERR_900: Validation failed: {reason}")]
    Validation { reason: String },

    /// Ledger reconciliation found a mismatch between wallets and the log.
    #[error("TE_ERR_901: Ledger audit mismatch: {reason}")]
    AuditMismatch { reason: String },

    /// The remote store or object storage is unreachable.
    #[error("TE_ERR_902: Upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TacktixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_prefix() {
        let err = TacktixError::MatchNotFound(MatchId::new());
        let msg = format!("{err}");
        assert!(msg.starts_with("TE_ERR_400"), "Got: {msg}");
    }

    #[test]
    fn insufficient_balance_display() {
        let err = TacktixError::InsufficientBalance {
            needed: Amount::from_minor(500),
            available: Amount::from_minor(100),
        };
        let msg = format!("{err}");
        assert!(msg.contains("TE_ERR_100"));
        assert!(msg.contains("5.00"));
        assert!(msg.contains("1.00"));
    }

    #[test]
    fn invalid_match_transition_display() {
        let err = TacktixError::InvalidMatchTransition {
            from: MatchStatus::Completed,
            to: MatchStatus::Active,
        };
        let msg = format!("{err}");
        assert!(msg.contains("TE_ERR_401"));
        assert!(msg.contains("COMPLETED"));
        assert!(msg.contains("ACTIVE"));
    }

    #[test]
    fn all_errors_have_te_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(TacktixError::InvalidAmount {
                amount: Amount::ZERO,
            }),
            Box::new(TacktixError::TransactionFinal(TransactionId::new())),
            Box::new(TacktixError::PersistenceConflict {
                reason: "test".into(),
            }),
            Box::new(TacktixError::MissingEvidence),
            Box::new(TacktixError::Unauthorized {
                reason: "test".into(),
            }),
            Box::new(TacktixError::AuditMismatch {
                reason: "test".into(),
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(
                msg.starts_with("TE_ERR_"),
                "Error missing TE_ERR_ prefix: {msg}"
            );
        }
    }
}
