//! Authenticated caller identity
//!
//! The ledger never authenticates anyone itself. An [`AuthContext`] is
//! produced by the authentication layer after it has resolved a bearer
//! credential, and the ledger trusts the identity and role it carries.

use crate::types::VoterId;
use serde::{Deserialize, Serialize};

/// Role of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// May cast votes and read chains and tallies
    Voter,
    /// May additionally administer elections and choices
    Admin,
}

/// Identity resolved by the authentication layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthContext {
    voter_id: VoterId,
    role: Role,
}

impl AuthContext {
    /// Build a context for a regular voter
    pub fn voter(voter_id: impl Into<VoterId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            role: Role::Voter,
        }
    }

    /// Build a context for an administrator
    pub fn admin(voter_id: impl Into<VoterId>) -> Self {
        Self {
            voter_id: voter_id.into(),
            role: Role::Admin,
        }
    }

    /// The authenticated voter identity
    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    /// The authenticated role
    pub fn role(&self) -> Role {
        self.role
    }

    /// Fail unless the caller holds the admin role
    pub fn require_admin(&self, action: &str) -> crate::Result<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(crate::Error::unauthorized(action))
        }
    }
}
