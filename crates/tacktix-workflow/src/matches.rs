//! Match lifecycle: create, join, cancel, finalize.
//!
//! Stakes move at the edges of the lifecycle: creating debits the host,
//! joining debits the opponent, and every terminal path either pays the
//! winner (completion) or returns the stakes (cancellation). The status
//! move is always claimed in the store before any refund, so a lost race
//! can never refund twice.

use tacktix_ledger::{LedgerStore, WalletService};
use tacktix_payout::{PayoutEngine, PayoutOutcome};
use tacktix_types::{
    Actor, Amount, LedgerConfig, Match, MatchId, MatchStatus, Result, TacktixError, UserId,
};

use crate::store::MatchStore;
use crate::submission;

pub(crate) fn require_moderator(actor: Actor, action: &str) -> Result<()> {
    if actor.is_moderator() {
        Ok(())
    } else {
        Err(TacktixError::Unauthorized {
            reason: format!("{action} requires a moderator"),
        })
    }
}

/// Match lifecycle operations over a [`MatchStore`] and the wallet.
pub struct MatchService<M, L> {
    store: M,
    wallet: WalletService<L>,
    config: LedgerConfig,
}

impl<M: MatchStore, L: LedgerStore> MatchService<M, L> {
    pub fn new(store: M, wallet: WalletService<L>, config: LedgerConfig) -> Self {
        Self {
            store,
            wallet,
            config,
        }
    }

    pub fn store(&self) -> &M {
        &self.store
    }

    pub fn wallet(&self) -> &WalletService<L> {
        &self.wallet
    }

    pub async fn get(&self, id: MatchId) -> Result<Match> {
        self.store.match_by_id(id).await
    }

    /// Challenges still waiting for an opponent, newest first.
    pub async fn open_challenges(&self) -> Result<Vec<Match>> {
        self.store.matches_with_status(MatchStatus::Pending).await
    }

    /// Create a challenge. The host's stake is debited up front; a host
    /// without the funds cannot post a challenge.
    pub async fn create(&self, host: Actor, bet_amount: Amount) -> Result<Match> {
        let m = Match::new(host.user_id, bet_amount);
        self.wallet.stake(host.user_id, m.id, bet_amount).await?;
        if let Err(err) = self.store.insert_match(m.clone()).await {
            self.return_stake(host.user_id, m.id, bet_amount).await?;
            return Err(err);
        }
        tracing::info!(match_id = %m.id, host = %host.user_id, bet = %bet_amount, "match created");
        Ok(m)
    }

    /// Join a pending challenge. The opponent's stake is debited, then the
    /// slot is claimed atomically; losing the claim refunds the stake.
    pub async fn join(&self, actor: Actor, id: MatchId) -> Result<Match> {
        let m = self.store.match_by_id(id).await?;
        if m.host_id == actor.user_id {
            return Err(TacktixError::SelfChallenge(id));
        }
        if m.opponent_id.is_some() {
            return Err(TacktixError::MatchFull(id));
        }

        self.wallet.stake(actor.user_id, id, m.bet_amount).await?;
        match self.store.join_match(id, actor.user_id).await {
            Ok(joined) => {
                tracing::info!(match_id = %id, opponent = %actor.user_id, "match joined");
                Ok(joined)
            }
            Err(err) => {
                // Lost the slot race; put the stake back.
                self.return_stake(actor.user_id, id, m.bet_amount).await?;
                Err(err)
            }
        }
    }

    /// Cancel a match and return every staked amount.
    ///
    /// Players may cancel only their own still-pending challenges;
    /// moderators may cancel any match the state machine allows. Retrying
    /// a cancel that already landed is a no-op returning the record, so
    /// a caller that lost its response can safely resubmit.
    pub async fn cancel(&self, actor: Actor, id: MatchId) -> Result<Match> {
        let m = self.store.match_by_id(id).await?;
        if !actor.is_moderator() {
            if !m.is_participant(actor.user_id) {
                return Err(TacktixError::NotAParticipant {
                    user: actor.user_id,
                    match_id: id,
                });
            }
            if !matches!(m.status, MatchStatus::Pending | MatchStatus::Cancelled) {
                return Err(TacktixError::Unauthorized {
                    reason: "only a moderator can cancel a match in progress".to_string(),
                });
            }
        }
        self.cancel_and_refund(id).await
    }

    /// Moderator ruling: void the match and return every staked amount.
    pub async fn void(&self, actor: Actor, id: MatchId) -> Result<Match> {
        require_moderator(actor, "voiding a match")?;
        let m = self.cancel_and_refund(id).await?;
        tracing::warn!(match_id = %id, moderator = %actor.user_id, "match voided");
        Ok(m)
    }

    /// Moderator ruling: complete the match with `winner` and pay out.
    ///
    /// Idempotent end to end: a retry re-completes with the same winner
    /// (no-op), finds the refund already recorded, and gets
    /// [`PayoutOutcome::AlreadyApplied`] from the engine.
    pub async fn finalize(
        &self,
        actor: Actor,
        id: MatchId,
        winner: UserId,
        engine: &PayoutEngine<L>,
    ) -> Result<(Match, PayoutOutcome)> {
        require_moderator(actor, "finalizing a match")?;
        let settled = self.settle(id, winner, engine).await?;
        tracing::info!(match_id = %id, %winner, moderator = %actor.user_id, "match finalized");
        Ok(settled)
    }

    /// Apply the outcome automatically when both participants' latest
    /// submissions agree on a winner. Gated by `auto_reconcile`; returns
    /// `None` when the gate is off, the match is not ACTIVE, or the
    /// submissions do not agree.
    pub async fn try_reconcile(
        &self,
        id: MatchId,
        engine: &PayoutEngine<L>,
    ) -> Result<Option<PayoutOutcome>> {
        if !self.config.auto_reconcile {
            return Ok(None);
        }
        let m = self.store.match_by_id(id).await?;
        if m.status != MatchStatus::Active {
            // Disputed and terminal matches are a moderator's call.
            return Ok(None);
        }
        let subs = self.store.submissions_for(id).await?;
        let Some(winner) = submission::agreed_winner(&m, &subs) else {
            return Ok(None);
        };

        let (_, outcome) = self.settle(id, winner, engine).await?;
        tracing::info!(match_id = %id, %winner, "match auto-reconciled from agreeing submissions");
        Ok(Some(outcome))
    }

    /// Complete, refund the winner's own stake, and pay the prize.
    async fn settle(
        &self,
        id: MatchId,
        winner: UserId,
        engine: &PayoutEngine<L>,
    ) -> Result<(Match, PayoutOutcome)> {
        let m = self.store.complete_match(id, winner).await?;
        self.return_stake(winner, id, m.bet_amount).await?;
        let outcome = engine.payout_for_match(&m).await?;
        Ok((m, outcome))
    }

    async fn cancel_and_refund(&self, id: MatchId) -> Result<Match> {
        // Claim the terminal status first. A retry re-lands on CANCELLED
        // and re-drives the refund loop, where each refund is at most
        // once per (user, match).
        let m = self.store.transition_match(id, MatchStatus::Cancelled).await?;
        for user in m.participants() {
            self.return_stake(user, id, m.bet_amount).await?;
        }
        tracing::info!(match_id = %id, "match cancelled, stakes returned");
        Ok(m)
    }

    /// Refund a stake, treating an already-recorded refund as done.
    async fn return_stake(&self, user: UserId, id: MatchId, amount: Amount) -> Result<()> {
        match self.wallet.refund_stake(user, id, amount).await {
            Ok(()) | Err(TacktixError::PersistenceConflict { .. }) => Ok(()),
            Err(other) => Err(other),
        }
    }
}
