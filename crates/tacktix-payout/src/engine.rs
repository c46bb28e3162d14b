//! The payout engine.
//!
//! Applies a completed match's payout exactly once: winner credit, ledger
//! entries, and the earnings row commit atomically through the store, and
//! a concurrent or retried invocation for the same match collapses into a
//! successful no-op.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use tacktix_ledger::{LedgerStore, PayoutRecord};
use tacktix_types::{
    Amount, LedgerConfig, Match, MatchId, MatchStatus, Result, TacktixError, UserId,
};

use crate::fees::FeePolicy;
use crate::receipt::PayoutReceipt;

/// Bounded memory of matches whose payout this process already saw
/// committed. Purely a cache in front of the store's unique constraint:
/// a hit answers an obvious retry locally, and eviction costs at worst
/// one extra store round trip on a late retry.
#[derive(Debug, Default)]
struct RecentPayouts {
    seen: HashSet<MatchId>,
    /// Insertion order, oldest at the front.
    order: VecDeque<MatchId>,
    capacity: usize,
}

impl RecentPayouts {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            ..Self::default()
        }
    }

    fn contains(&self, match_id: MatchId) -> bool {
        self.seen.contains(&match_id)
    }

    fn remember(&mut self, match_id: MatchId) {
        if !self.seen.insert(match_id) {
            return;
        }
        self.order.push_back(match_id);
        while self.seen.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.seen.remove(&oldest);
        }
    }
}

/// What a payout invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutOutcome {
    /// This invocation moved the money.
    Applied(PayoutReceipt),
    /// An earlier or concurrent invocation already did; nothing changed.
    AlreadyApplied,
}

impl PayoutOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&PayoutReceipt> {
        match self {
            Self::Applied(receipt) => Some(receipt),
            Self::AlreadyApplied => None,
        }
    }
}

/// Exactly-once match payout over a [`LedgerStore`].
pub struct PayoutEngine<S> {
    store: S,
    policy: FeePolicy,
    recent: Mutex<RecentPayouts>,
}

impl<S: LedgerStore> PayoutEngine<S> {
    /// Engine with policy and cache size from configuration.
    #[must_use]
    pub fn new(store: S, config: &LedgerConfig) -> Self {
        Self::with_policy(
            store,
            FeePolicy::new(config.fee_bps),
            config.payout_cache_size,
        )
    }

    #[must_use]
    pub fn with_policy(store: S, policy: FeePolicy, cache_size: usize) -> Self {
        Self {
            store,
            policy,
            recent: Mutex::new(RecentPayouts::with_capacity(cache_size)),
        }
    }

    #[must_use]
    pub fn policy(&self) -> FeePolicy {
        self.policy
    }

    /// Pay out a match prize to its winner.
    ///
    /// Retries and concurrent invocations for the same match return
    /// [`PayoutOutcome::AlreadyApplied`] without touching any balance.
    ///
    /// # Errors
    /// - `InvalidAmount` if `prize` is not positive
    /// - any store error other than the duplicate-payout conflict
    pub async fn payout(
        &self,
        winner: UserId,
        match_id: MatchId,
        prize: Amount,
    ) -> Result<PayoutOutcome> {
        if !prize.is_positive() {
            return Err(TacktixError::InvalidAmount { amount: prize });
        }

        if self.recently_paid(match_id) {
            tracing::debug!(%match_id, "payout retry answered from the local cache");
            return Ok(PayoutOutcome::AlreadyApplied);
        }

        let split = self.policy.split(prize);
        let record = PayoutRecord {
            match_id,
            winner,
            prize,
            fee: split.fee,
            net: split.net,
        };

        match self.store.commit_payout(&record).await {
            Ok(()) => {
                self.remember_paid(match_id);
                tracing::info!(
                    %match_id, %winner, %prize, fee = %split.fee, net = %split.net,
                    "payout applied"
                );
                Ok(PayoutOutcome::Applied(PayoutReceipt {
                    match_id,
                    winner,
                    prize,
                    fee: split.fee,
                    net: split.net,
                    paid_at: chrono::Utc::now(),
                }))
            }
            Err(TacktixError::PersistenceConflict { .. }) => {
                // The concurrent winner already completed it; that is success.
                self.remember_paid(match_id);
                tracing::info!(%match_id, "payout already committed by a concurrent invocation");
                Ok(PayoutOutcome::AlreadyApplied)
            }
            Err(other) => Err(other),
        }
    }

    /// Pay out a match record. The match must be COMPLETED with a winner.
    ///
    /// # Errors
    /// `UnresolvedWinner` if the match is not completed or has no winner.
    pub async fn payout_for_match(&self, m: &Match) -> Result<PayoutOutcome> {
        let winner = match (m.status, m.winner_id) {
            (MatchStatus::Completed, Some(winner)) => winner,
            _ => return Err(TacktixError::UnresolvedWinner(m.id)),
        };
        self.payout(winner, m.id, m.prize_amount()).await
    }

    fn recently_paid(&self, match_id: MatchId) -> bool {
        self.recent
            .lock()
            .map(|cache| cache.contains(match_id))
            .unwrap_or(false)
    }

    fn remember_paid(&self, match_id: MatchId) {
        if let Ok(mut cache) = self.recent.lock() {
            cache.remember(match_id);
        }
    }
}
