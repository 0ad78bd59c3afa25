//! # Tessera Identity
//!
//! The identity registry maps capability-token types to the projects that own
//! them. A project proves "I am acting for project X" by presenting a value
//! of its own token type; the registry resolves the type to its registered
//! owner and enabled flag.
//!
//! Unforgeability is visibility-based: a token type keeps its constructor
//! private to the declaring module, so only that project's code can mint
//! instances. The registry never checks this itself; it is the contract a
//! conforming token type upholds. See [`ProjectToken`].
//!
//! Registration and the enable/disable toggle are gated on a single
//! administrator address fixed at registry construction. Records are never
//! deleted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Identity error types
pub mod errors;

/// Registry of capability-token identities
pub mod registry;

/// The capability-token trait
pub mod token;

pub use errors::{IdentityError, Result};
pub use registry::{IdentityRecord, IdentityRegistry};
pub use token::ProjectToken;
