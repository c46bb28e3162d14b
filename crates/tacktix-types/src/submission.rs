//! Match-result submissions.
//!
//! Each participant may submit (or amend) a claimed result with evidence.
//! The latest submission per participant is the authoritative input to
//! moderation; submissions never mutate match status by themselves, except
//! that a DISPUTE-type submission flags the match as disputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MatchId, SubmissionId, UserId};

/// The outcome a participant claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    Win,
    Loss,
    Draw,
    Dispute,
}

impl ResultType {
    /// WIN claims must name the winner (the submitter).
    #[must_use]
    pub fn requires_winner(self) -> bool {
        matches!(self, Self::Win)
    }
}

impl std::fmt::Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win => write!(f, "WIN"),
            Self::Loss => write!(f, "LOSS"),
            Self::Draw => write!(f, "DRAW"),
            Self::Dispute => write!(f, "DISPUTE"),
        }
    }
}

/// A participant's claimed match result plus its evidence references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResultSubmission {
    pub id: SubmissionId,
    pub match_id: MatchId,
    pub submitted_by: UserId,
    pub result_type: ResultType,
    /// The winner this submission claims, if any.
    pub winner_id: Option<UserId>,
    /// Ordered evidence references (object storage URLs or inline digests).
    pub proof_urls: Vec<String>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl MatchResultSubmission {
    #[must_use]
    pub fn new(
        match_id: MatchId,
        submitted_by: UserId,
        result_type: ResultType,
        winner_id: Option<UserId>,
        proof_urls: Vec<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: SubmissionId::new(),
            match_id,
            submitted_by,
            result_type,
            winner_id,
            proof_urls,
            notes: notes.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_requires_winner() {
        assert!(ResultType::Win.requires_winner());
        assert!(!ResultType::Loss.requires_winner());
        assert!(!ResultType::Draw.requires_winner());
        assert!(!ResultType::Dispute.requires_winner());
    }

    #[test]
    fn serde_roundtrip_preserves_proofs() {
        let winner = UserId::new();
        let sub = MatchResultSubmission::new(
            MatchId::new(),
            winner,
            ResultType::Win,
            Some(winner),
            vec!["a.png".to_string(), "b.png".to_string()],
            "final screen",
        );
        let json = serde_json::to_string(&sub).unwrap();
        let back: MatchResultSubmission = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result_type, ResultType::Win);
        assert_eq!(back.winner_id, Some(winner));
        assert_eq!(back.proof_urls, vec!["a.png", "b.png"]);
    }
}
