//! Authentication and session resolution.
//!
//! - `gateway`: the external auth collaborator contract and an in-process
//!   implementation
//! - `password`: password hashing and verification with Argon2
//!
//! Role resolution is an explicit dependency: the gateway owns the user to
//! role mapping, nothing in the core ever assumes a default role.

pub mod gateway;
pub mod password;

use chilimba_core::role::Role;
use chilimba_core::types::UserId;

use crate::error::ServiceResult;
use gateway::AuthGateway;

/// A resolved sign-in: who the user is and what role the gateway assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    /// ## Summary
    /// Resolves a session for a signed-in user through the gateway.
    ///
    /// ## Errors
    /// Returns the gateway's error if the user's role cannot be resolved.
    pub async fn resolve<G: AuthGateway>(gateway: &G, user_id: UserId) -> ServiceResult<Self> {
        let role = gateway.resolve_role(&user_id).await?;
        Ok(Self { user_id, role })
    }

    /// Builds a session directly. Assembly and test helper; production code
    /// goes through `resolve`.
    #[must_use]
    pub fn with_role(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}
