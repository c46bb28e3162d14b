//! Caller identity.
//!
//! Every operation takes an explicit [`Actor`] supplied by the identity
//! provider at the boundary. Nothing in the ledger or workflow queries an
//! ambient session.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// The role an authenticated identity acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Moderator,
}

/// An authenticated caller: a user ID plus the role it acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn player(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Player,
        }
    }

    #[must_use]
    pub fn moderator(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Moderator,
        }
    }

    #[must_use]
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}
