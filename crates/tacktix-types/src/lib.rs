//! # tacktix-types
//!
//! Shared types, errors, and configuration for the **TacktixEdge** ledger
//! and match-payout service.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`MatchId`], [`TransactionId`], [`SubmissionId`], [`DisputeId`]
//! - **Money**: [`Amount`] (integer minor-unit currency)
//! - **Identity**: [`Actor`], [`Role`] — explicit caller context for every operation
//! - **Transaction model**: [`Transaction`], [`TransactionKind`], [`TransactionStatus`]
//! - **Match model**: [`Match`], [`MatchStatus`]
//! - **Result submissions**: [`MatchResultSubmission`], [`ResultType`]
//! - **Dispute model**: [`Dispute`], [`DisputeStatus`]
//! - **Earnings model**: [`PlatformEarnings`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`TacktixError`] with `TE_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod dispute;
pub mod earnings;
pub mod error;
pub mod identity;
pub mod ids;
pub mod match_state;
pub mod money;
pub mod submission;
pub mod transaction;

// Re-export all primary types at crate root for ergonomic imports:
//   use tacktix_types::{Amount, Match, Transaction, Dispute, ...};

pub use config::*;
pub use dispute::*;
pub use earnings::*;
pub use error::*;
pub use identity::*;
pub use ids::*;
pub use match_state::*;
pub use money::*;
pub use submission::*;
pub use transaction::*;

// Constants are accessed via `tacktix_types::constants::FOO`
// (not re-exported to avoid name collisions).
