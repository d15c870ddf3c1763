use thiserror::Error;

use chilimba_core::role::{Op, Role};

/// Errors reported by the remote document store.
///
/// Cloneable because a store failure fans out to every live subscription on
/// the affected path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    RemoteError(#[from] RemoteError),

    #[error(transparent)]
    DatabaseError(#[from] chilimba_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] chilimba_core::error::CoreError),

    #[error("Forbidden: role {role} may not {op}")]
    Forbidden { role: Role, op: Op },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("Blocking task failed: {0}")]
    TaskJoin(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
