//! # tacktix-workflow
//!
//! **Match workflow**: challenge lifecycle, result submissions with
//! evidence, and dispute moderation — the layer that decides *when* the
//! ledger and payout engine move money.
//!
//! ## Architecture
//!
//! - [`MatchStore`]: the seam to the remote store for matches, result
//!   submissions, and disputes; [`MemoryMatchStore`] is the reference
//!   implementation
//! - [`MatchService`]: create / join / cancel / finalize. Stakes are
//!   debited up front and every terminal path either pays the winner or
//!   refunds the participants
//! - [`SubmissionService`]: participants report outcomes with evidence
//!   persisted through an [`EvidenceStore`]
//! - [`DisputeService`]: moderator adjudication; a resolution ruling
//!   awards the match or voids it
//!
//! Every operation takes an explicit [`tacktix_types::Actor`]; there is no
//! ambient session. Moderator-only operations fail with `Unauthorized`
//! for player actors.

pub mod dispute;
pub mod evidence;
pub mod matches;
pub mod store;
pub mod submission;

pub use dispute::{DisputeService, Resolution, Ruling};
pub use evidence::{EvidenceFile, EvidenceStore, InlineEvidenceStore, ObjectEvidenceStore};
pub use matches::MatchService;
pub use store::{MatchStore, MemoryMatchStore};
pub use submission::SubmissionService;
