//! Authorization error types

use serde::{Deserialize, Serialize};
use tessera_identity::IdentityError;

/// Failures raised by the authorization registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AuthorizationError {
    /// The caller is not the fixed administrator.
    #[error("caller is not the administrator")]
    NotAdmin,

    /// A project attempted to grant access to itself.
    #[error("a project cannot authorize itself")]
    SelfAuthorization,

    /// A grant already exists for this (authorizer, authorized) pair.
    #[error("grant already exists for this pair; revoke it first")]
    AlreadyAuthorized,

    /// No grant exists for this (authorizer, authorized) pair.
    #[error("no grant exists for this pair")]
    GrantNotFound,

    /// The metered usage path was exercised without a valid grant.
    #[error("access is not authorized")]
    Unauthorized,

    /// Token verification failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Authorization result alias.
pub type Result<T> = std::result::Result<T, AuthorizationError>;
