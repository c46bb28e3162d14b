//! Ledger conservation audit.
//!
//! Rebuilds the expected wallet total from the transaction log and checks
//! it against the actual sum of balances, and checks the earnings table
//! against the PLATFORM_FEE entries:
//!
//! ```text
//! Σ wallets == Σ deposits(COMPLETED) - Σ withdrawals(not REJECTED)
//!            - Σ bets(COMPLETED) + Σ winnings(COMPLETED) + Σ refunds(COMPLETED)
//! Σ earnings == Σ platform fees(COMPLETED)
//! ```
//!
//! A mismatch means money moved without a matching log entry (or vice
//! versa) — the one thing the ledger exists to prevent.

use tacktix_types::{
    Amount, Direction, Result, TacktixError, TransactionKind, TransactionStatus,
};

use crate::store::LedgerStore;

/// Totals computed for one audit pass.
#[derive(Debug, Clone, Copy)]
pub struct AuditReport {
    /// Wallet total implied by the log.
    pub expected_wallet_total: Amount,
    /// Actual sum of all wallet balances.
    pub actual_wallet_total: Amount,
    /// Sum of COMPLETED PLATFORM_FEE entries.
    pub fee_transaction_total: Amount,
    /// Sum of the earnings table.
    pub earnings_total: Amount,
}

impl AuditReport {
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.expected_wallet_total == self.actual_wallet_total
            && self.fee_transaction_total == self.earnings_total
    }
}

/// Whether a log entry currently affects its owner's wallet.
///
/// Withdrawals debit at request time, so they count in every status except
/// REJECTED (which refunds). Every other kind counts only once COMPLETED.
fn counts_against_wallet(kind: TransactionKind, status: TransactionStatus) -> bool {
    match kind {
        TransactionKind::Withdrawal => status != TransactionStatus::Rejected,
        _ => status == TransactionStatus::Completed,
    }
}

/// Compute the audit totals for a store.
pub async fn report<S: LedgerStore>(store: &S) -> Result<AuditReport> {
    let mut expected: i128 = 0;
    let mut fee_total: i128 = 0;

    for tx in store.all_transactions().await? {
        if !counts_against_wallet(tx.kind, tx.status) {
            continue;
        }
        let minor = i128::from(tx.amount.minor());
        match tx.kind.direction() {
            Direction::Credit => expected += minor,
            Direction::Debit => expected -= minor,
            Direction::PotSide => fee_total += minor,
        }
    }

    let narrow = |v: i128, what: &str| -> Result<Amount> {
        i64::try_from(v)
            .map(Amount::from_minor)
            .map_err(|_| TacktixError::AuditMismatch {
                reason: format!("{what} total out of range"),
            })
    };

    Ok(AuditReport {
        expected_wallet_total: narrow(expected, "wallet")?,
        actual_wallet_total: store.total_wallet_balance().await?,
        fee_transaction_total: narrow(fee_total, "fee")?,
        earnings_total: store.total_earnings().await?,
    })
}

/// Verify conservation, failing with [`TacktixError::AuditMismatch`] on any
/// imbalance.
pub async fn verify_conservation<S: LedgerStore>(store: &S) -> Result<()> {
    let report = report(store).await?;
    if report.expected_wallet_total != report.actual_wallet_total {
        return Err(TacktixError::AuditMismatch {
            reason: format!(
                "wallet total {} != log-implied total {}",
                report.actual_wallet_total, report.expected_wallet_total
            ),
        });
    }
    if report.fee_transaction_total != report.earnings_total {
        return Err(TacktixError::AuditMismatch {
            reason: format!(
                "earnings total {} != fee transaction total {}",
                report.earnings_total, report.fee_transaction_total
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryLedger, PayoutRecord};
    use crate::wallet::WalletService;
    use tacktix_types::{MatchId, UserId};

    fn minor(v: i64) -> Amount {
        Amount::from_minor(v)
    }

    #[tokio::test]
    async fn empty_ledger_is_balanced() {
        let store = MemoryLedger::new();
        verify_conservation(&store).await.unwrap();
    }

    #[tokio::test]
    async fn busy_sequence_stays_balanced() {
        let store = MemoryLedger::new();
        let wallet = WalletService::new(store.clone());
        let alice = UserId::new();
        let bob = UserId::new();
        let match_id = MatchId::new();

        // Deposits: one settled, one rejected, one in flight.
        let d1 = wallet.deposit(alice, minor(5_000), "dep").await.unwrap();
        wallet.complete_deposit(d1.id).await.unwrap();
        let d2 = wallet.deposit(alice, minor(9_999), "dep").await.unwrap();
        wallet.reject_deposit(d2.id).await.unwrap();
        wallet.deposit(bob, minor(777), "dep").await.unwrap();
        let d3 = wallet.deposit(bob, minor(5_000), "dep").await.unwrap();
        wallet.complete_deposit(d3.id).await.unwrap();

        // Both stake, winner paid, winner's stake refunded.
        wallet.stake(alice, match_id, minor(2_000)).await.unwrap();
        wallet.stake(bob, match_id, minor(2_000)).await.unwrap();
        store
            .commit_payout(&PayoutRecord {
                match_id,
                winner: alice,
                prize: minor(2_000),
                fee: minor(200),
                net: minor(1_800),
            })
            .await
            .unwrap();
        wallet.refund_stake(alice, match_id, minor(2_000)).await.unwrap();

        // A withdrawal in flight and one rejected.
        wallet
            .request_withdrawal(alice, minor(1_000), "wd")
            .await
            .unwrap();
        let wd = wallet
            .request_withdrawal(bob, minor(500), "wd")
            .await
            .unwrap();
        wallet.reject_withdrawal(wd.id).await.unwrap();

        let r = report(&store).await.unwrap();
        assert!(r.is_balanced(), "report not balanced: {r:?}");
        verify_conservation(&store).await.unwrap();
    }

    #[tokio::test]
    async fn unlogged_credit_fails_audit() {
        let store = MemoryLedger::new();
        let user = UserId::new();
        // Raw credit with no log entry: the exact drift the audit exists for.
        store.credit(user, minor(100)).await.unwrap();

        let err = verify_conservation(&store).await.unwrap_err();
        assert!(matches!(err, TacktixError::AuditMismatch { .. }));
    }

    #[tokio::test]
    async fn set_balance_drift_fails_audit() {
        let store = MemoryLedger::new();
        store
            .set_balance(UserId::new(), minor(1_234))
            .await
            .unwrap();
        assert!(verify_conservation(&store).await.is_err());
    }
}
