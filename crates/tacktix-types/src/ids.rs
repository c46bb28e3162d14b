//! Globally unique identifiers used throughout the ledger service.
//!
//! All entity IDs use UUIDv7 for time-ordered lexicographic sorting, so
//! sorting by ID matches creation order — the transaction log relies on
//! this for its reverse-chronological reads.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
        )]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a user / wallet owner.
    UserId
}

uuid_id! {
    /// Unique identifier for a wagering match.
    MatchId
}

uuid_id! {
    /// Unique identifier for a ledger transaction.
    TransactionId
}

uuid_id! {
    /// Unique identifier for a match-result submission.
    SubmissionId
}

uuid_id! {
    /// Unique identifier for a dispute.
    DisputeId
}

impl TransactionId {
    /// Extract the embedded timestamp (milliseconds since UNIX epoch) from UUIDv7.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        let bytes = self.0.as_bytes();
        u64::from_be_bytes([
            0, 0, bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5],
        ])
    }
}
