//! The ledger storage seam and its in-memory reference implementation.
//!
//! [`LedgerStore`] models the remote relational store (`wallets`,
//! `transactions`, `platform_earnings`). Each method maps to one atomic
//! store operation; the composite methods exist because their steps must
//! commit together or not at all. [`MemoryLedger`] serializes every
//! operation behind a single async mutex, which gives the same atomicity
//! a relational backend provides with row locks and unique constraints.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use tacktix_types::{
    Amount, Direction, MatchId, PlatformEarnings, Result, TacktixError, Transaction,
    TransactionId, TransactionKind, TransactionStatus, UserId,
};

/// Filter for transaction-log reads. Results are reverse-chronological.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    user: Option<UserId>,
    kind: Option<TransactionKind>,
    statuses: Vec<TransactionStatus>,
    match_id: Option<MatchId>,
}

impl TransactionFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to a status. May be called repeatedly to build a status set.
    #[must_use]
    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.statuses.push(status);
        self
    }

    #[must_use]
    pub fn for_match(mut self, match_id: MatchId) -> Self {
        self.match_id = Some(match_id);
        self
    }

    /// Whether a transaction passes this filter.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(user) = self.user {
            if tx.user_id != user {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&tx.status) {
            return false;
        }
        if let Some(match_id) = self.match_id {
            if tx.match_id != Some(match_id) {
                return false;
            }
        }
        true
    }
}

/// Everything one match payout writes, committed all-or-nothing.
#[derive(Debug, Clone, Copy)]
pub struct PayoutRecord {
    pub match_id: MatchId,
    pub winner: UserId,
    /// The prize pool the fee is taken from.
    pub prize: Amount,
    /// Platform's share. `fee + net == prize`.
    pub fee: Amount,
    /// Winner's credit.
    pub net: Amount,
}

/// The seam to the remote relational store.
///
/// Every method is one atomic operation on the backing store; callers never
/// read-then-write balances across calls. Implementations backed by a real
/// remote store surface connectivity failures as
/// [`TacktixError::UpstreamUnavailable`].
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Current balance. Creates a zero wallet on first access.
    async fn balance(&self, user: UserId) -> Result<Amount>;

    /// Overwrite a wallet balance (admin / migration only — bypasses the
    /// log, so the audit will flag it). Fails with `InvalidAmount` if
    /// `amount` is negative.
    async fn set_balance(&self, user: UserId, amount: Amount) -> Result<()>;

    /// Atomic increment. `amount` must be positive.
    async fn credit(&self, user: UserId, amount: Amount) -> Result<Amount>;

    /// Atomic conditional decrement: fails with `InsufficientBalance` and
    /// leaves the wallet unchanged if it would go negative.
    async fn try_debit(&self, user: UserId, amount: Amount) -> Result<Amount>;

    /// Append an entry. Fails with `Validation` for non-positive amounts.
    async fn record_transaction(&self, tx: Transaction) -> Result<TransactionId>;

    /// Move an entry through its status lifecycle. Terminal entries are
    /// immutable (`TransactionFinal`).
    async fn update_transaction_status(
        &self,
        id: TransactionId,
        to: TransactionStatus,
    ) -> Result<()>;

    /// Fetch one entry.
    async fn transaction(&self, id: TransactionId) -> Result<Transaction>;

    /// Filtered read, reverse-chronological.
    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Atomic debit + append: the sufficiency check, the wallet decrement,
    /// and the log entry commit together (withdrawal requests and stakes).
    /// BET entries are unique per (user, match): a second stake for the
    /// same match fails with `PersistenceConflict` without debiting, so a
    /// raced duplicate join can never take two stakes from one wallet.
    async fn debit_and_record(&self, tx: Transaction) -> Result<TransactionId>;

    /// Atomic deposit settlement: credit the wallet and mark the deposit
    /// COMPLETED together. Returns the new balance.
    async fn settle_deposit(&self, id: TransactionId) -> Result<Amount>;

    /// Atomic withdrawal rejection: refund the debited amount and mark the
    /// withdrawal REJECTED together. Returns the new balance.
    async fn reject_withdrawal(&self, id: TransactionId) -> Result<Amount>;

    /// Atomic stake return: credit `amount` back and append a REFUND entry.
    /// At most one refund per (user, match): a second call fails with
    /// `PersistenceConflict`, which callers treat as already-refunded.
    async fn refund_stake(&self, user: UserId, match_id: MatchId, amount: Amount) -> Result<()>;

    /// Atomic payout: credit the winner, append the MATCH_WINNINGS and
    /// PLATFORM_FEE entries, and insert the earnings row — all or nothing.
    /// The unique constraint on (match, MATCH_WINNINGS) makes a duplicate
    /// fail with `PersistenceConflict`.
    async fn commit_payout(&self, record: &PayoutRecord) -> Result<()>;

    /// The earnings row for a match, if its payout has been applied.
    async fn earnings(&self, match_id: MatchId) -> Result<Option<PlatformEarnings>>;

    /// Sum of all earnings rows.
    async fn total_earnings(&self) -> Result<Amount>;

    /// Full log dump (audit).
    async fn all_transactions(&self) -> Result<Vec<Transaction>>;

    /// Sum of all wallet balances (audit).
    async fn total_wallet_balance(&self) -> Result<Amount>;
}

#[derive(Default)]
struct Inner {
    wallets: HashMap<UserId, Amount>,
    log: Vec<Transaction>,
    earnings: HashMap<MatchId, PlatformEarnings>,
}

impl Inner {
    fn tx_index(&self, id: TransactionId) -> Result<usize> {
        self.log
            .iter()
            .position(|tx| tx.id == id)
            .ok_or(TacktixError::TransactionNotFound(id))
    }

    fn credit_wallet(&mut self, user: UserId, amount: Amount) -> Result<Amount> {
        let entry = self.wallets.entry(user).or_insert(Amount::ZERO);
        let updated = entry
            .checked_add(amount)
            .ok_or(TacktixError::BalanceOverflow(user))?;
        *entry = updated;
        Ok(updated)
    }

    fn debit_wallet(&mut self, user: UserId, amount: Amount) -> Result<Amount> {
        let entry = self.wallets.entry(user).or_insert(Amount::ZERO);
        if *entry < amount {
            return Err(TacktixError::InsufficientBalance {
                needed: amount,
                available: *entry,
            });
        }
        let updated = entry
            .checked_sub(amount)
            .ok_or(TacktixError::BalanceOverflow(user))?;
        *entry = updated;
        Ok(updated)
    }

    fn check_tx_transition(&self, index: usize, to: TransactionStatus) -> Result<()> {
        let tx = &self.log[index];
        if tx.status.is_final() {
            return Err(TacktixError::TransactionFinal(tx.id));
        }
        if !tx.status.can_transition_to(to) {
            return Err(TacktixError::InvalidStatusTransition {
                from: tx.status,
                to,
            });
        }
        Ok(())
    }

    fn advance_tx(&mut self, index: usize, to: TransactionStatus) -> Result<()> {
        self.check_tx_transition(index, to)?;
        self.log[index].status = to;
        Ok(())
    }

    fn has_winnings_for(&self, match_id: MatchId) -> bool {
        self.earnings.contains_key(&match_id)
            || self.log.iter().any(|tx| {
                tx.kind == TransactionKind::MatchWinnings && tx.match_id == Some(match_id)
            })
    }

    fn has_refund_for(&self, user: UserId, match_id: MatchId) -> bool {
        self.log.iter().any(|tx| {
            tx.kind == TransactionKind::Refund
                && tx.user_id == user
                && tx.match_id == Some(match_id)
        })
    }

    fn has_bet_for(&self, user: UserId, match_id: MatchId) -> bool {
        self.log.iter().any(|tx| {
            tx.kind == TransactionKind::Bet
                && tx.user_id == user
                && tx.match_id == Some(match_id)
        })
    }
}

fn require_positive(amount: Amount) -> Result<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(TacktixError::InvalidAmount { amount })
    }
}

/// In-memory reference store. Cloning shares the underlying state, so
/// services wired from clones see one ledger.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedger {
    async fn balance(&self, user: UserId) -> Result<Amount> {
        let mut inner = self.inner.lock().await;
        Ok(*inner.wallets.entry(user).or_insert(Amount::ZERO))
    }

    async fn set_balance(&self, user: UserId, amount: Amount) -> Result<()> {
        if amount.is_negative() {
            return Err(TacktixError::InvalidAmount { amount });
        }
        let mut inner = self.inner.lock().await;
        inner.wallets.insert(user, amount);
        Ok(())
    }

    async fn credit(&self, user: UserId, amount: Amount) -> Result<Amount> {
        require_positive(amount)?;
        let mut inner = self.inner.lock().await;
        inner.credit_wallet(user, amount)
    }

    async fn try_debit(&self, user: UserId, amount: Amount) -> Result<Amount> {
        require_positive(amount)?;
        let mut inner = self.inner.lock().await;
        inner.debit_wallet(user, amount)
    }

    async fn record_transaction(&self, tx: Transaction) -> Result<TransactionId> {
        if !tx.amount.is_positive() {
            return Err(TacktixError::Validation {
                reason: format!("transaction amount must be positive, got {}", tx.amount),
            });
        }
        let mut inner = self.inner.lock().await;
        let id = tx.id;
        inner.log.push(tx);
        Ok(id)
    }

    async fn update_transaction_status(
        &self,
        id: TransactionId,
        to: TransactionStatus,
    ) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let index = inner.tx_index(id)?;
        inner.advance_tx(index, to)
    }

    async fn transaction(&self, id: TransactionId) -> Result<Transaction> {
        let inner = self.inner.lock().await;
        let index = inner.tx_index(id)?;
        Ok(inner.log[index].clone())
    }

    async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let inner = self.inner.lock().await;
        let mut list: Vec<Transaction> = inner
            .log
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        list.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(list)
    }

    async fn debit_and_record(&self, tx: Transaction) -> Result<TransactionId> {
        require_positive(tx.amount)?;
        if tx.kind.direction() != Direction::Debit {
            return Err(TacktixError::Validation {
                reason: format!("debit_and_record requires a debit kind, got {}", tx.kind),
            });
        }
        let mut inner = self.inner.lock().await;
        // Unique constraint on (user, match_id, BET).
        if tx.kind == TransactionKind::Bet {
            if let Some(match_id) = tx.match_id {
                if inner.has_bet_for(tx.user_id, match_id) {
                    return Err(TacktixError::PersistenceConflict {
                        reason: format!(
                            "stake for match {match_id} already taken from {}",
                            tx.user_id
                        ),
                    });
                }
            }
        }
        inner.debit_wallet(tx.user_id, tx.amount)?;
        let id = tx.id;
        inner.log.push(tx);
        Ok(id)
    }

    async fn settle_deposit(&self, id: TransactionId) -> Result<Amount> {
        let mut inner = self.inner.lock().await;
        let index = inner.tx_index(id)?;
        let (user, amount, kind) = {
            let tx = &inner.log[index];
            (tx.user_id, tx.amount, tx.kind)
        };
        if kind != TransactionKind::Deposit {
            return Err(TacktixError::Validation {
                reason: format!("settle_deposit on a {kind} transaction"),
            });
        }
        inner.check_tx_transition(index, TransactionStatus::Completed)?;
        // Credit first: it cannot partially apply, so the status flip below
        // happens only once the money has moved.
        let updated = inner.credit_wallet(user, amount)?;
        inner.log[index].status = TransactionStatus::Completed;
        Ok(updated)
    }

    async fn reject_withdrawal(&self, id: TransactionId) -> Result<Amount> {
        let mut inner = self.inner.lock().await;
        let index = inner.tx_index(id)?;
        let (user, amount, kind) = {
            let tx = &inner.log[index];
            (tx.user_id, tx.amount, tx.kind)
        };
        if kind != TransactionKind::Withdrawal {
            return Err(TacktixError::Validation {
                reason: format!("reject_withdrawal on a {kind} transaction"),
            });
        }
        inner.check_tx_transition(index, TransactionStatus::Rejected)?;
        let updated = inner.credit_wallet(user, amount)?;
        inner.log[index].status = TransactionStatus::Rejected;
        Ok(updated)
    }

    async fn refund_stake(&self, user: UserId, match_id: MatchId, amount: Amount) -> Result<()> {
        require_positive(amount)?;
        let mut inner = self.inner.lock().await;
        if inner.has_refund_for(user, match_id) {
            return Err(TacktixError::PersistenceConflict {
                reason: format!("stake for match {match_id} already refunded to {user}"),
            });
        }
        inner.credit_wallet(user, amount)?;
        inner.log.push(Transaction::completed(
            user,
            TransactionKind::Refund,
            amount,
            Some(match_id),
            "stake returned",
        ));
        Ok(())
    }

    async fn commit_payout(&self, record: &PayoutRecord) -> Result<()> {
        require_positive(record.net)?;
        if record.fee.is_negative()
            || record.fee.checked_add(record.net) != Some(record.prize)
        {
            return Err(TacktixError::Validation {
                reason: format!(
                    "payout split does not add up: fee {} + net {} != prize {}",
                    record.fee, record.net, record.prize
                ),
            });
        }
        let mut inner = self.inner.lock().await;
        // Unique constraint on (match_id, MATCH_WINNINGS).
        if inner.has_winnings_for(record.match_id) {
            return Err(TacktixError::PersistenceConflict {
                reason: format!("payout for match {} already committed", record.match_id),
            });
        }
        inner.credit_wallet(record.winner, record.net)?;
        inner.log.push(Transaction::completed(
            record.winner,
            TransactionKind::MatchWinnings,
            record.net,
            Some(record.match_id),
            "match winnings",
        ));
        if record.fee.is_positive() {
            inner.log.push(Transaction::completed(
                record.winner,
                TransactionKind::PlatformFee,
                record.fee,
                Some(record.match_id),
                "platform fee",
            ));
        }
        inner.earnings.insert(
            record.match_id,
            PlatformEarnings::new(record.match_id, record.fee),
        );
        Ok(())
    }

    async fn earnings(&self, match_id: MatchId) -> Result<Option<PlatformEarnings>> {
        let inner = self.inner.lock().await;
        Ok(inner.earnings.get(&match_id).cloned())
    }

    async fn total_earnings(&self) -> Result<Amount> {
        let inner = self.inner.lock().await;
        let mut total = Amount::ZERO;
        for e in inner.earnings.values() {
            total = total
                .checked_add(e.amount)
                .ok_or(TacktixError::AuditMismatch {
                    reason: "earnings total overflow".into(),
                })?;
        }
        Ok(total)
    }

    async fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let inner = self.inner.lock().await;
        Ok(inner.log.clone())
    }

    async fn total_wallet_balance(&self) -> Result<Amount> {
        let inner = self.inner.lock().await;
        let mut total = Amount::ZERO;
        for balance in inner.wallets.values() {
            total = total
                .checked_add(*balance)
                .ok_or(TacktixError::AuditMismatch {
                    reason: "wallet total overflow".into(),
                })?;
        }
        Ok(total)
    }
}
