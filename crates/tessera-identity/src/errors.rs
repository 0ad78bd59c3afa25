//! Identity error types

use serde::{Deserialize, Serialize};
use tessera_core::Address;

/// Failures raised by the identity registry and by callers that check a
/// verified owner against a claimed address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum IdentityError {
    /// The caller is not the fixed administrator.
    #[error("caller is not the administrator")]
    NotAdmin,

    /// A record already exists for this capability type.
    #[error("capability type is already registered")]
    AlreadyRegistered,

    /// No record exists for this capability type.
    #[error("capability type is not registered")]
    NotRegistered,

    /// The identity exists but has been disabled by the administrator.
    #[error("identity is disabled")]
    IdentityDisabled,

    /// The token's owner does not match the address the caller claimed.
    #[error("token owner {actual} does not match expected {expected}")]
    OwnerMismatch {
        /// The address the operation required.
        expected: Address,
        /// The owner the token actually resolved to.
        actual: Address,
    },
}

/// Identity result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
