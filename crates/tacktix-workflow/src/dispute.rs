//! Dispute moderation.
//!
//! A participant opens a dispute against an active match; a moderator
//! investigates and closes it with a ruling. Rulings reuse the match
//! service's idempotent settle and void paths, so a crashed or retried
//! resolution never moves money twice. Dismissing a dispute leaves a
//! DISPUTED match in place for the moderator to complete or cancel
//! separately.

use tacktix_ledger::LedgerStore;
use tacktix_payout::{PayoutEngine, PayoutOutcome};
use tacktix_types::{
    Actor, Dispute, DisputeId, DisputeStatus, MatchId, MatchStatus, Result, TacktixError, UserId,
};

use crate::matches::{require_moderator, MatchService};
use crate::store::MatchStore;

/// A moderator's decision on a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ruling {
    /// Complete the match with this winner and pay out.
    AwardWinner(UserId),
    /// Cancel the match and return both stakes.
    VoidMatch,
}

/// What applying a ruling did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Paid(PayoutOutcome),
    Voided,
}

/// Dispute lifecycle operations over a [`MatchStore`].
pub struct DisputeService<M> {
    store: M,
}

impl<M: MatchStore> DisputeService<M> {
    pub fn new(store: M) -> Self {
        Self { store }
    }

    /// Open a dispute against a match the actor participates in.
    ///
    /// The match must be ACTIVE or DISPUTED; at most one dispute may be
    /// open per match. Opening flags an active match as disputed.
    pub async fn open(
        &self,
        actor: Actor,
        match_id: MatchId,
        reason: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Dispute> {
        let m = self.store.match_by_id(match_id).await?;
        if !m.is_participant(actor.user_id) {
            return Err(TacktixError::NotAParticipant {
                user: actor.user_id,
                match_id,
            });
        }
        if !matches!(m.status, MatchStatus::Active | MatchStatus::Disputed) {
            return Err(TacktixError::Validation {
                reason: format!("a {} match cannot be disputed", m.status),
            });
        }

        // Insert first: the uniqueness constraint is the claim.
        let dispute = Dispute::open(match_id, actor.user_id, reason, description);
        self.store.insert_dispute(dispute.clone()).await?;

        if m.status == MatchStatus::Active {
            match self.store.transition_match(match_id, MatchStatus::Disputed).await {
                Ok(_) | Err(TacktixError::InvalidMatchTransition { .. }) => {}
                Err(other) => return Err(other),
            }
        }
        tracing::warn!(
            %match_id, dispute = %dispute.id, reporter = %actor.user_id,
            "dispute opened"
        );
        Ok(dispute)
    }

    pub async fn get(&self, id: DisputeId) -> Result<Dispute> {
        self.store.dispute_by_id(id).await
    }

    /// The open dispute for a match, if any.
    pub async fn open_for(&self, match_id: MatchId) -> Result<Option<Dispute>> {
        self.store.open_dispute_for(match_id).await
    }

    /// Moderator takes the dispute under investigation.
    pub async fn begin_investigation(&self, actor: Actor, id: DisputeId) -> Result<Dispute> {
        require_moderator(actor, "investigating a dispute")?;
        let d = self
            .store
            .transition_dispute(id, DisputeStatus::Investigating)
            .await?;
        tracing::info!(dispute = %id, moderator = %actor.user_id, "dispute under investigation");
        Ok(d)
    }

    /// Dismiss a frivolous dispute. Allowed straight from OPEN; the match
    /// itself is not touched.
    pub async fn dismiss(&self, actor: Actor, id: DisputeId) -> Result<Dispute> {
        require_moderator(actor, "dismissing a dispute")?;
        let d = self
            .store
            .transition_dispute(id, DisputeStatus::Dismissed)
            .await?;
        tracing::warn!(dispute = %id, moderator = %actor.user_id, "dispute dismissed");
        Ok(d)
    }

    /// Close an investigated dispute with a ruling.
    ///
    /// The ruling is applied before the dispute moves to RESOLVED; both
    /// ruling paths are idempotent, so a retry after a crash between the
    /// two steps cannot double-move money.
    pub async fn resolve<L: LedgerStore>(
        &self,
        actor: Actor,
        id: DisputeId,
        ruling: Ruling,
        matches: &MatchService<M, L>,
        engine: &PayoutEngine<L>,
    ) -> Result<Resolution> {
        require_moderator(actor, "resolving a dispute")?;
        let d = self.store.dispute_by_id(id).await?;
        if !d.status.can_transition_to(DisputeStatus::Resolved) {
            return Err(TacktixError::InvalidDisputeTransition {
                from: d.status,
                to: DisputeStatus::Resolved,
            });
        }

        let resolution = match ruling {
            Ruling::AwardWinner(winner) => {
                let (_, outcome) = matches.finalize(actor, d.match_id, winner, engine).await?;
                Resolution::Paid(outcome)
            }
            Ruling::VoidMatch => {
                matches.void(actor, d.match_id).await?;
                Resolution::Voided
            }
        };

        self.store
            .transition_dispute(id, DisputeStatus::Resolved)
            .await?;
        tracing::info!(dispute = %id, moderator = %actor.user_id, ?ruling, "dispute resolved");
        Ok(resolution)
    }
}
