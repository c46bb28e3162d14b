//! The workflow storage seam and its in-memory reference implementation.
//!
//! [`MatchStore`] models the remote store's `matches`, `match_results`, and
//! `disputes` tables. As with the ledger store, each method is one atomic
//! operation: status moves are compare-and-set against the state machine,
//! joining claims the opponent slot exactly once, and completion carries
//! the winner so `winner_id` can never exist without COMPLETED status.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use tacktix_types::{
    Dispute, DisputeId, DisputeStatus, Match, MatchId, MatchResultSubmission, MatchStatus, Result,
    SubmissionId, TacktixError, UserId,
};

/// The seam to the remote store for match workflow state.
///
/// Implementations backed by a real remote store surface connectivity
/// failures as [`TacktixError::UpstreamUnavailable`].
#[allow(async_fn_in_trait)]
pub trait MatchStore {
    /// Insert a new match. Fails with `PersistenceConflict` on a duplicate ID.
    async fn insert_match(&self, m: Match) -> Result<MatchId>;

    /// Fetch one match.
    async fn match_by_id(&self, id: MatchId) -> Result<Match>;

    /// All matches currently in `status`, newest first.
    async fn matches_with_status(&self, status: MatchStatus) -> Result<Vec<Match>>;

    /// Atomically claim the opponent slot and activate the match.
    ///
    /// Fails with `MatchFull` if an opponent already joined, `SelfChallenge`
    /// if the host tries to join, and `InvalidMatchTransition` if the match
    /// is no longer PENDING.
    async fn join_match(&self, id: MatchId, opponent: UserId) -> Result<Match>;

    /// Compare-and-set status move for every target except COMPLETED
    /// (completion carries a winner; use [`Self::complete_match`]).
    ///
    /// Idempotent: moving a match to the status it already holds is a
    /// no-op returning the record, so a retried cancel or void does not
    /// fail after the first attempt claimed the status.
    async fn transition_match(&self, id: MatchId, to: MatchStatus) -> Result<Match>;

    /// Atomically complete a match with its winner.
    ///
    /// Idempotent: completing an already-completed match with the same
    /// winner is a no-op returning the record; a different winner fails
    /// with `PersistenceConflict`.
    async fn complete_match(&self, id: MatchId, winner: UserId) -> Result<Match>;

    /// Append a result submission.
    async fn insert_submission(&self, sub: MatchResultSubmission) -> Result<SubmissionId>;

    /// All submissions for a match, newest first.
    async fn submissions_for(&self, match_id: MatchId) -> Result<Vec<MatchResultSubmission>>;

    /// Insert a dispute. At most one non-terminal dispute may exist per
    /// match; a second fails with `DisputeAlreadyOpen`.
    async fn insert_dispute(&self, dispute: Dispute) -> Result<DisputeId>;

    /// Fetch one dispute.
    async fn dispute_by_id(&self, id: DisputeId) -> Result<Dispute>;

    /// The non-terminal dispute for a match, if any.
    async fn open_dispute_for(&self, match_id: MatchId) -> Result<Option<Dispute>>;

    /// Compare-and-set dispute status move.
    async fn transition_dispute(&self, id: DisputeId, to: DisputeStatus) -> Result<Dispute>;
}

#[derive(Default)]
struct Inner {
    matches: HashMap<MatchId, Match>,
    submissions: Vec<MatchResultSubmission>,
    disputes: HashMap<DisputeId, Dispute>,
}

impl Inner {
    fn match_mut(&mut self, id: MatchId) -> Result<&mut Match> {
        self.matches
            .get_mut(&id)
            .ok_or(TacktixError::MatchNotFound(id))
    }
}

/// In-memory reference store. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MemoryMatchStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryMatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryMatchStore {
    async fn insert_match(&self, m: Match) -> Result<MatchId> {
        let mut inner = self.inner.lock().await;
        if inner.matches.contains_key(&m.id) {
            return Err(TacktixError::PersistenceConflict {
                reason: format!("match {} already exists", m.id),
            });
        }
        let id = m.id;
        inner.matches.insert(id, m);
        Ok(id)
    }

    async fn match_by_id(&self, id: MatchId) -> Result<Match> {
        let inner = self.inner.lock().await;
        inner
            .matches
            .get(&id)
            .cloned()
            .ok_or(TacktixError::MatchNotFound(id))
    }

    async fn matches_with_status(&self, status: MatchStatus) -> Result<Vec<Match>> {
        let inner = self.inner.lock().await;
        let mut found: Vec<Match> = inner
            .matches
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn join_match(&self, id: MatchId, opponent: UserId) -> Result<Match> {
        let mut inner = self.inner.lock().await;
        let m = inner.match_mut(id)?;
        if m.host_id == opponent {
            return Err(TacktixError::SelfChallenge(id));
        }
        if m.opponent_id.is_some() {
            return Err(TacktixError::MatchFull(id));
        }
        if m.status != MatchStatus::Pending {
            return Err(TacktixError::InvalidMatchTransition {
                from: m.status,
                to: MatchStatus::Active,
            });
        }
        m.opponent_id = Some(opponent);
        m.status = MatchStatus::Active;
        Ok(m.clone())
    }

    async fn transition_match(&self, id: MatchId, to: MatchStatus) -> Result<Match> {
        if to == MatchStatus::Completed {
            return Err(TacktixError::Validation {
                reason: "completion carries a winner; use complete_match".to_string(),
            });
        }
        let mut inner = self.inner.lock().await;
        let m = inner.match_mut(id)?;
        if m.status == to {
            // Retry of an applied transition.
            return Ok(m.clone());
        }
        if !m.status.can_transition_to(to) {
            return Err(TacktixError::InvalidMatchTransition { from: m.status, to });
        }
        m.status = to;
        Ok(m.clone())
    }

    async fn complete_match(&self, id: MatchId, winner: UserId) -> Result<Match> {
        let mut inner = self.inner.lock().await;
        let m = inner.match_mut(id)?;
        if !m.is_participant(winner) {
            return Err(TacktixError::NotAParticipant {
                user: winner,
                match_id: id,
            });
        }
        if m.status == MatchStatus::Completed {
            // Retry of an applied completion.
            if m.winner_id == Some(winner) {
                return Ok(m.clone());
            }
            return Err(TacktixError::PersistenceConflict {
                reason: format!("match {id} already completed with a different winner"),
            });
        }
        if !m.status.can_transition_to(MatchStatus::Completed) {
            return Err(TacktixError::InvalidMatchTransition {
                from: m.status,
                to: MatchStatus::Completed,
            });
        }
        m.status = MatchStatus::Completed;
        m.winner_id = Some(winner);
        Ok(m.clone())
    }

    async fn insert_submission(&self, sub: MatchResultSubmission) -> Result<SubmissionId> {
        let mut inner = self.inner.lock().await;
        if !inner.matches.contains_key(&sub.match_id) {
            return Err(TacktixError::MatchNotFound(sub.match_id));
        }
        let id = sub.id;
        inner.submissions.push(sub);
        Ok(id)
    }

    async fn submissions_for(&self, match_id: MatchId) -> Result<Vec<MatchResultSubmission>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .submissions
            .iter()
            .rev()
            .filter(|sub| sub.match_id == match_id)
            .cloned()
            .collect())
    }

    async fn insert_dispute(&self, dispute: Dispute) -> Result<DisputeId> {
        let mut inner = self.inner.lock().await;
        if !inner.matches.contains_key(&dispute.match_id) {
            return Err(TacktixError::MatchNotFound(dispute.match_id));
        }
        let already_open = inner
            .disputes
            .values()
            .any(|d| d.match_id == dispute.match_id && !d.status.is_terminal());
        if already_open {
            return Err(TacktixError::DisputeAlreadyOpen(dispute.match_id));
        }
        let id = dispute.id;
        inner.disputes.insert(id, dispute);
        Ok(id)
    }

    async fn dispute_by_id(&self, id: DisputeId) -> Result<Dispute> {
        let inner = self.inner.lock().await;
        inner
            .disputes
            .get(&id)
            .cloned()
            .ok_or(TacktixError::DisputeNotFound(id))
    }

    async fn open_dispute_for(&self, match_id: MatchId) -> Result<Option<Dispute>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .disputes
            .values()
            .find(|d| d.match_id == match_id && !d.status.is_terminal())
            .cloned())
    }

    async fn transition_dispute(&self, id: DisputeId, to: DisputeStatus) -> Result<Dispute> {
        let mut inner = self.inner.lock().await;
        let d = inner
            .disputes
            .get_mut(&id)
            .ok_or(TacktixError::DisputeNotFound(id))?;
        if !d.status.can_transition_to(to) {
            return Err(TacktixError::InvalidDisputeTransition { from: d.status, to });
        }
        d.status = to;
        Ok(d.clone())
    }
}
