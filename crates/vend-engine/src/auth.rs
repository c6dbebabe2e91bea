//! # Session Authority Boundary
//!
//! Authentication is an external collaborator: some component above this
//! crate (JWT verifier, session table, test stub) resolves a request's
//! credential token into a [`Principal`]. The engine consumes principals and
//! never touches credentials beyond storing the opaque handle at
//! registration.

use std::fmt;

use thiserror::Error;

use vend_core::{Account, Role};

// =============================================================================
// Principal
// =============================================================================

/// The authenticated identity behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Account id of the authenticated user.
    pub account_id: String,
    /// Username of the authenticated user.
    pub username: String,
    /// Role the account was registered with.
    pub role: Role,
}

impl Principal {
    /// Builds a principal from a stored account.
    pub fn from_account(account: &Account) -> Self {
        Principal {
            account_id: account.id.clone(),
            username: account.username.clone(),
            role: account.role,
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

// =============================================================================
// Session Authority
// =============================================================================

/// Resolves a credential token into a principal.
///
/// Implementations live outside this crate (the transport layer wires one
/// in). Tests use an in-memory stub.
#[allow(async_fn_in_trait)]
pub trait SessionAuthority: Send + Sync {
    /// Resolves the principal behind `token`, or fails with an
    /// [`AuthError`] when the credential is invalid or expired.
    async fn resolve_principal(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Credential resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token is malformed, unknown, or signed incorrectly.
    #[error("Could not validate credentials")]
    InvalidCredentials,

    /// Token was valid once but has expired.
    #[error("Credentials have expired")]
    Expired,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_principal_from_account() {
        let account = Account {
            id: "a1".to_string(),
            username: "neo42".to_string(),
            role: Role::Buyer,
            deposit: 0,
            credential: "opaque".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let principal = Principal::from_account(&account);
        assert_eq!(principal.account_id, "a1");
        assert_eq!(principal.role, Role::Buyer);
        assert_eq!(principal.to_string(), "neo42 (buyer)");
    }
}
