//! Result submissions.
//!
//! Participants report outcomes with evidence. A submission never moves
//! money; it is the input to moderation (or to auto-reconciliation when
//! both sides agree). The claimed winner is derived from the result type
//! rather than trusted from the caller: WIN claims the submitter, LOSS
//! concedes to the opponent, DRAW and DISPUTE claim nobody.

use tacktix_types::{
    Actor, LedgerConfig, Match, MatchId, MatchResultSubmission, MatchStatus, Result, ResultType,
    TacktixError, UserId,
};

use crate::evidence::{EvidenceFile, EvidenceStore};
use crate::store::MatchStore;

/// The latest submission by `user`, given a newest-first slice as returned
/// by [`MatchStore::submissions_for`].
#[must_use]
pub fn latest_by(subs: &[MatchResultSubmission], user: UserId) -> Option<&MatchResultSubmission> {
    subs.iter().find(|sub| sub.submitted_by == user)
}

/// The winner both participants' latest submissions agree on, if any.
///
/// Requires a joined opponent, a latest submission from each side, and
/// both naming the same participant.
#[must_use]
pub fn agreed_winner(m: &Match, subs: &[MatchResultSubmission]) -> Option<UserId> {
    let opponent = m.opponent_id?;
    let host_claim = latest_by(subs, m.host_id)?.winner_id?;
    let opponent_claim = latest_by(subs, opponent)?.winner_id?;
    (host_claim == opponent_claim && m.is_participant(host_claim)).then_some(host_claim)
}

/// Result reporting over a [`MatchStore`] and an [`EvidenceStore`].
pub struct SubmissionService<M, E> {
    store: M,
    evidence: E,
    config: LedgerConfig,
}

impl<M: MatchStore, E: EvidenceStore> SubmissionService<M, E> {
    pub fn new(store: M, evidence: E, config: LedgerConfig) -> Self {
        Self {
            store,
            evidence,
            config,
        }
    }

    /// Submit (or amend) a claimed result with evidence.
    ///
    /// The match must be ACTIVE or DISPUTED and the actor a participant.
    /// At least one artifact is required, each within the size ceiling.
    /// A DISPUTE-type submission also flags an active match as disputed.
    pub async fn submit(
        &self,
        actor: Actor,
        match_id: MatchId,
        result_type: ResultType,
        files: &[EvidenceFile],
        notes: impl Into<String>,
    ) -> Result<MatchResultSubmission> {
        let m = self.store.match_by_id(match_id).await?;
        if !m.is_participant(actor.user_id) {
            return Err(TacktixError::NotAParticipant {
                user: actor.user_id,
                match_id,
            });
        }
        if !matches!(m.status, MatchStatus::Active | MatchStatus::Disputed) {
            return Err(TacktixError::Validation {
                reason: format!("results cannot be submitted for a {} match", m.status),
            });
        }
        if files.is_empty() {
            return Err(TacktixError::MissingEvidence);
        }
        for file in files {
            if file.size() > self.config.max_evidence_bytes {
                return Err(TacktixError::EvidenceTooLarge {
                    size: file.size(),
                    limit: self.config.max_evidence_bytes,
                });
            }
        }

        let mut proof_urls = Vec::with_capacity(files.len());
        for file in files {
            proof_urls.push(self.evidence.store(file).await?);
        }

        let winner_id = claimed_winner(&m, actor.user_id, result_type);
        let sub = MatchResultSubmission::new(
            match_id,
            actor.user_id,
            result_type,
            winner_id,
            proof_urls,
            notes,
        );
        self.store.insert_submission(sub.clone()).await?;
        tracing::info!(
            %match_id, submitter = %actor.user_id, result = %result_type,
            proofs = sub.proof_urls.len(), "result submitted"
        );

        if result_type == ResultType::Dispute && m.status == MatchStatus::Active {
            match self.store.transition_match(match_id, MatchStatus::Disputed).await {
                Ok(_) => {
                    tracing::warn!(%match_id, "match flagged as disputed by submission");
                }
                Err(TacktixError::InvalidMatchTransition { .. }) => {
                    // A concurrent actor already moved the match on.
                    tracing::debug!(%match_id, "dispute flag lost a status race");
                }
                Err(other) => return Err(other),
            }
        }

        Ok(sub)
    }

    /// A participant's latest submission for a match.
    pub async fn latest_for(
        &self,
        match_id: MatchId,
        user: UserId,
    ) -> Result<Option<MatchResultSubmission>> {
        let subs = self.store.submissions_for(match_id).await?;
        Ok(latest_by(&subs, user).cloned())
    }

    /// All submissions for a match, newest first.
    pub async fn history(&self, match_id: MatchId) -> Result<Vec<MatchResultSubmission>> {
        self.store.submissions_for(match_id).await
    }
}

fn claimed_winner(m: &Match, submitter: UserId, result_type: ResultType) -> Option<UserId> {
    match result_type {
        ResultType::Win => Some(submitter),
        ResultType::Loss => m.participants().into_iter().find(|u| *u != submitter),
        ResultType::Draw | ResultType::Dispute => None,
    }
}
