//! Namespace error types

use serde::{Deserialize, Serialize};
use tessera_core::Address;
use tessera_identity::IdentityError;

/// Failures raised by the namespace store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum NamespaceError {
    /// The namespace handle does not refer to a node.
    #[error("namespace does not exist")]
    NamespaceNotFound,

    /// The claimed project does not own the namespace.
    #[error("namespace is owned by {owner}, not {claimed}")]
    ProjectMismatch {
        /// The project the caller claimed owns the namespace.
        claimed: Address,
        /// The recorded owner.
        owner: Address,
    },

    /// No active grant permits the caller to read this project's data.
    #[error("no read authorization from the owning project")]
    NoPermission,

    /// No slot of the requested type exists at the namespace.
    #[error("data slot is missing")]
    SlotMissing,

    /// The slot exists but its value is currently checked out.
    #[error("data slot is checked out")]
    SlotCheckedOut,

    /// A present slot of this type already exists at the namespace.
    #[error("data slot is already initialized")]
    SlotAlreadyPresent,

    /// A checkout of this slot is outstanding; patching now would orphan the
    /// in-flight voucher.
    #[error("a checkout of this slot is outstanding")]
    CheckoutOutstanding,

    /// The voucher does not correspond to a checked-out slot in this store.
    #[error("voucher does not match a checked-out slot")]
    VoucherMismatch,

    /// Token verification failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Namespace result alias.
pub type Result<T> = std::result::Result<T, NamespaceError>;
