//! # tacktix-ledger
//!
//! **Ledger**: the Balance Store and Transaction Log — the system of record
//! for user funds.
//!
//! ## Architecture
//!
//! The ledger sits behind the [`LedgerStore`] trait, the seam to the remote
//! relational store. Every trait method is one atomic store operation;
//! multi-step money movements (withdraw request, deposit settlement, stake
//! refund, payout) are composite methods so they commit all-or-nothing.
//! Correctness comes from the store's atomic primitives, never from
//! client-side read-then-write.
//!
//! - [`MemoryLedger`]: reference implementation, one mutex per store so each
//!   operation is serialized and atomic
//! - [`WalletService`]: deposit / withdrawal lifecycle and match stakes
//! - [`audit`]: rebuilds the expected wallet total from the log and checks
//!   it against actual balances (conservation)
//!
//! ## Money flow
//!
//! ```text
//! deposit (PENDING) -> settle_deposit() -> wallet credit
//! request_withdrawal() -> wallet debit (PENDING) -> complete | reject (refund)
//! stake() -> wallet debit (BET, COMPLETED)
//! commit_payout() -> winner credit + MATCH_WINNINGS + PLATFORM_FEE + earnings
//! ```

pub mod audit;
pub mod store;
pub mod wallet;

pub use store::{LedgerStore, MemoryLedger, PayoutRecord, TransactionFilter};
pub use wallet::WalletService;
