//! The authentication collaborator contract.
//!
//! `sign_in` and `register` hand back an opaque user key; `resolve_role` is
//! the explicit role lookup that the service facade consults. The in-process
//! implementation keeps salted Argon2 hashes, never plain text.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chilimba_core::error::CoreError;
use chilimba_core::role::Role;
use chilimba_core::types::UserId;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};

pub trait AuthGateway: Send + Sync {
    /// Signs a user in, returning the gateway's key for them.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = ServiceResult<UserId>> + Send;

    /// Registers a new user with an explicit role assignment.
    fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> impl Future<Output = ServiceResult<UserId>> + Send;

    fn sign_out(&self, user_id: &UserId) -> impl Future<Output = ServiceResult<()>> + Send;

    /// Looks up the role the gateway assigned to this user.
    fn resolve_role(&self, user_id: &UserId) -> impl Future<Output = ServiceResult<Role>> + Send;
}

struct StoredUser {
    user_id: UserId,
    password_hash: String,
}

#[derive(Default)]
struct State {
    by_email: HashMap<String, StoredUser>,
    roles: HashMap<UserId, Role>,
    signed_in: HashSet<UserId>,
}

/// In-process auth gateway backing tests and local development.
#[derive(Default)]
pub struct MemoryAuthGateway {
    state: Mutex<State>,
}

impl MemoryAuthGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the user currently holds a session.
    #[must_use]
    pub fn is_signed_in(&self, user_id: &UserId) -> bool {
        self.state().signed_in.contains(user_id)
    }
}

impl AuthGateway for MemoryAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<UserId> {
        let mut state = self.state();

        // A missing account and a wrong password are indistinguishable to the
        // caller.
        let Some(user) = state.by_email.get(email) else {
            return Err(ServiceError::NotAuthenticated);
        };
        verify_password(password, &user.password_hash)?;

        let user_id = user.user_id.clone();
        state.signed_in.insert(user_id.clone());

        tracing::debug!(%user_id, "User signed in");
        Ok(user_id)
    }

    async fn register(&self, email: &str, password: &str, role: Role) -> ServiceResult<UserId> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(CoreError::ValidationError(
                "email and password must not be blank".to_owned(),
            )
            .into());
        }

        let password_hash = hash_password(password)?;
        let mut state = self.state();

        if state.by_email.contains_key(email) {
            return Err(ServiceError::Conflict(format!(
                "account already exists: {email}"
            )));
        }

        let user_id = UserId::new(uuid::Uuid::new_v4().to_string());
        state.by_email.insert(
            email.to_owned(),
            StoredUser {
                user_id: user_id.clone(),
                password_hash,
            },
        );
        state.roles.insert(user_id.clone(), role);

        tracing::info!(%user_id, %role, "Registered user");
        Ok(user_id)
    }

    async fn sign_out(&self, user_id: &UserId) -> ServiceResult<()> {
        self.state().signed_in.remove(user_id);
        tracing::debug!(%user_id, "User signed out");
        Ok(())
    }

    async fn resolve_role(&self, user_id: &UserId) -> ServiceResult<Role> {
        self.state()
            .roles
            .get(user_id)
            .copied()
            .ok_or_else(|| ServiceError::NotFound(format!("no role recorded for {user_id}")))
    }
}
