//! Wallet operations: deposits, withdrawals, and match stakes.
//!
//! Deposits credit the wallet only when settled; withdrawals debit at
//! request time so the funds can never be spent twice while a request is
//! in flight, and are refunded if the request is rejected.

use tacktix_types::{
    Amount, MatchId, Result, TacktixError, Transaction, TransactionId, TransactionKind,
    TransactionStatus, UserId,
};

use crate::store::{LedgerStore, TransactionFilter};

/// User-facing wallet operations over a [`LedgerStore`].
pub struct WalletService<S> {
    store: S,
}

impl<S: LedgerStore> WalletService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current balance; creates a zero wallet on first access.
    pub async fn balance(&self, user: UserId) -> Result<Amount> {
        self.store.balance(user).await
    }

    /// Start a deposit. The wallet is credited only on [`Self::complete_deposit`].
    pub async fn deposit(
        &self,
        user: UserId,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(TacktixError::InvalidAmount { amount });
        }
        let tx = Transaction::pending(user, TransactionKind::Deposit, amount, None, description);
        let record = tx.clone();
        self.store.record_transaction(tx).await?;
        Ok(record)
    }

    /// Flag a deposit for manual verification.
    pub async fn mark_deposit_verifying(&self, id: TransactionId) -> Result<()> {
        self.expect_kind(id, TransactionKind::Deposit).await?;
        self.store
            .update_transaction_status(id, TransactionStatus::PendingVerification)
            .await
    }

    /// Settle a verified deposit: credit the wallet and complete the entry
    /// atomically. Returns the new balance.
    pub async fn complete_deposit(&self, id: TransactionId) -> Result<Amount> {
        let balance = self.store.settle_deposit(id).await?;
        tracing::info!(transaction = %id, %balance, "deposit settled");
        Ok(balance)
    }

    /// Reject a deposit. No funds were credited, so only the status moves.
    pub async fn reject_deposit(&self, id: TransactionId) -> Result<()> {
        self.expect_kind(id, TransactionKind::Deposit).await?;
        self.store
            .update_transaction_status(id, TransactionStatus::Rejected)
            .await?;
        tracing::warn!(transaction = %id, "deposit rejected");
        Ok(())
    }

    /// Request a withdrawal. The amount is debited immediately; a rejection
    /// refunds it. Fails with `InsufficientBalance` without touching the
    /// wallet.
    pub async fn request_withdrawal(
        &self,
        user: UserId,
        amount: Amount,
        description: impl Into<String>,
    ) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(TacktixError::InvalidAmount { amount });
        }
        let tx = Transaction::pending(user, TransactionKind::Withdrawal, amount, None, description);
        let record = tx.clone();
        self.store.debit_and_record(tx).await?;
        Ok(record)
    }

    /// Mark a withdrawal paid out. The money already left at request time.
    pub async fn complete_withdrawal(&self, id: TransactionId) -> Result<()> {
        self.expect_kind(id, TransactionKind::Withdrawal).await?;
        self.store
            .update_transaction_status(id, TransactionStatus::Completed)
            .await
    }

    /// Reject a withdrawal and refund the debited amount atomically.
    /// Returns the new balance.
    pub async fn reject_withdrawal(&self, id: TransactionId) -> Result<Amount> {
        let balance = self.store.reject_withdrawal(id).await?;
        tracing::warn!(transaction = %id, %balance, "withdrawal rejected, funds returned");
        Ok(balance)
    }

    /// Debit a match stake. Written COMPLETED at birth — stakes are only
    /// ever corrected by a separate REFUND entry, and the store takes at
    /// most one stake per (user, match).
    pub async fn stake(
        &self,
        user: UserId,
        match_id: MatchId,
        amount: Amount,
    ) -> Result<Transaction> {
        if !amount.is_positive() {
            return Err(TacktixError::InvalidAmount { amount });
        }
        let tx = Transaction::completed(
            user,
            TransactionKind::Bet,
            amount,
            Some(match_id),
            "match stake",
        );
        let record = tx.clone();
        self.store.debit_and_record(tx).await?;
        Ok(record)
    }

    /// Return a stake (cancelled or voided match). At most once per
    /// (user, match); a conflict means a concurrent refund already landed.
    pub async fn refund_stake(
        &self,
        user: UserId,
        match_id: MatchId,
        amount: Amount,
    ) -> Result<()> {
        self.store.refund_stake(user, match_id, amount).await
    }

    /// Full transaction history for a user, newest first.
    pub async fn history(&self, user: UserId) -> Result<Vec<Transaction>> {
        self.store
            .transactions(&TransactionFilter::new().for_user(user))
            .await
    }

    /// Deposits still in flight (PENDING or PENDING_VERIFICATION), newest first.
    pub async fn pending_deposits(&self, user: UserId) -> Result<Vec<Transaction>> {
        self.store
            .transactions(
                &TransactionFilter::new()
                    .for_user(user)
                    .with_kind(TransactionKind::Deposit)
                    .with_status(TransactionStatus::Pending)
                    .with_status(TransactionStatus::PendingVerification),
            )
            .await
    }

    async fn expect_kind(&self, id: TransactionId, kind: TransactionKind) -> Result<()> {
        let tx = self.store.transaction(id).await?;
        if tx.kind == kind {
            Ok(())
        } else {
            Err(TacktixError::Validation {
                reason: format!("expected a {kind} transaction, got {}", tx.kind),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryLedger;

    fn service() -> WalletService<MemoryLedger> {
        WalletService::new(MemoryLedger::new())
    }

    fn minor(v: i64) -> Amount {
        Amount::from_minor(v)
    }

    #[tokio::test]
    async fn deposit_credits_only_on_completion() {
        let wallet = service();
        let user = UserId::new();

        let tx = wallet.deposit(user, minor(500), "card deposit").await.unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), Amount::ZERO);

        wallet.mark_deposit_verifying(tx.id).await.unwrap();
        assert_eq!(wallet.pending_deposits(user).await.unwrap().len(), 1);

        let balance = wallet.complete_deposit(tx.id).await.unwrap();
        assert_eq!(balance, minor(500));
        assert!(wallet.pending_deposits(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_deposit_never_credits() {
        let wallet = service();
        let user = UserId::new();
        let tx = wallet.deposit(user, minor(500), "card deposit").await.unwrap();
        wallet.reject_deposit(tx.id).await.unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), Amount::ZERO);

        // Final: cannot be completed afterwards.
        let err = wallet.complete_deposit(tx.id).await.unwrap_err();
        assert!(matches!(err, TacktixError::TransactionFinal(_)));
    }

    #[tokio::test]
    async fn withdrawal_scenario_exact_balance() {
        let wallet = service();
        let user = UserId::new();
        let tx = wallet.deposit(user, minor(500), "dep").await.unwrap();
        wallet.complete_deposit(tx.id).await.unwrap();

        // Withdraw the full 500: succeeds, balance becomes 0.
        let wd = wallet
            .request_withdrawal(user, minor(500), "cash out")
            .await
            .unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), Amount::ZERO);
        wallet.complete_withdrawal(wd.id).await.unwrap();

        // A second withdrawal of even 1 minor unit fails.
        let err = wallet
            .request_withdrawal(user, minor(1), "cash out")
            .await
            .unwrap_err();
        assert!(matches!(err, TacktixError::InsufficientBalance { .. }));
        assert_eq!(wallet.balance(user).await.unwrap(), Amount::ZERO);
    }

    #[tokio::test]
    async fn rejected_withdrawal_refunds() {
        let wallet = service();
        let user = UserId::new();
        let dep = wallet.deposit(user, minor(300), "dep").await.unwrap();
        wallet.complete_deposit(dep.id).await.unwrap();

        let wd = wallet
            .request_withdrawal(user, minor(200), "cash out")
            .await
            .unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), minor(100));

        let balance = wallet.reject_withdrawal(wd.id).await.unwrap();
        assert_eq!(balance, minor(300));
    }

    #[tokio::test]
    async fn zero_and_negative_amounts_rejected() {
        let wallet = service();
        let user = UserId::new();
        for amount in [Amount::ZERO, minor(-100)] {
            assert!(matches!(
                wallet.deposit(user, amount, "d").await.unwrap_err(),
                TacktixError::InvalidAmount { .. }
            ));
            assert!(matches!(
                wallet.request_withdrawal(user, amount, "w").await.unwrap_err(),
                TacktixError::InvalidAmount { .. }
            ));
            assert!(matches!(
                wallet.stake(user, MatchId::new(), amount).await.unwrap_err(),
                TacktixError::InvalidAmount { .. }
            ));
        }
    }

    #[tokio::test]
    async fn stake_and_refund_round_trip() {
        let wallet = service();
        let user = UserId::new();
        let match_id = MatchId::new();
        let dep = wallet.deposit(user, minor(2_000), "dep").await.unwrap();
        wallet.complete_deposit(dep.id).await.unwrap();

        wallet.stake(user, match_id, minor(2_000)).await.unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), Amount::ZERO);

        wallet.refund_stake(user, match_id, minor(2_000)).await.unwrap();
        assert_eq!(wallet.balance(user).await.unwrap(), minor(2_000));

        // Newest first: refund, bet, deposit.
        let history = wallet.history(user).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].kind, TransactionKind::Refund);
        assert_eq!(history[2].kind, TransactionKind::Deposit);
    }

    #[tokio::test]
    async fn kind_mismatch_is_validation_error() {
        let wallet = service();
        let user = UserId::new();
        let dep = wallet.deposit(user, minor(100), "dep").await.unwrap();
        let err = wallet.complete_withdrawal(dep.id).await.unwrap_err();
        assert!(matches!(err, TacktixError::Validation { .. }));
    }
}
