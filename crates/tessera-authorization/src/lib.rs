//! # Tessera Authorization
//!
//! Delegated, time-bounded, revocable read grants between projects. An
//! authorizer project grants a named project read access to its data; the
//! grant can expire lazily, be disabled by the administrator, or be revoked
//! outright by the authorizer.
//!
//! Per ordered pair (authorizer, authorized) the state machine is:
//!
//! ```text
//! NoGrant --grant--> Active --revoke--> NoGrant
//!                    Active --toggle--> Disabled
//!                    Active --time----> expired (lazy; record remains)
//! ```
//!
//! Expiry is evaluated at check time against the context's clock. Expired
//! records are not reaped; they fail verification until explicitly revoked.
//!
//! Every grant and revoke authenticates the caller through the identity
//! registry first, consuming a capability token.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Authorization error types
pub mod errors;

/// Grant records and keys
pub mod grant;

/// Registry of delegated read grants
pub mod registry;

pub use errors::{AuthorizationError, Result};
pub use grant::{AuthorizationRecord, GrantKey};
pub use registry::AuthorizationRegistry;
