//! # Tessera Namespace
//!
//! A forest of namespace nodes, each owned by a project, each holding at most
//! one typed data slot per data type. Foreign projects read a namespace only
//! through an authorization-registry grant; the owning project reads it by
//! presenting its own capability token.
//!
//! Data access is exclusive by construction: a checkout detaches the value
//! and hands back a one-shot [`Voucher`] bound to the slot, and redeeming the
//! voucher is the only way to make the slot readable again. A second checkout
//! fails immediately rather than blocking or queueing, and a voucher that is
//! never redeemed strands its slot permanently.
//!
//! The full sharing flow, owner to foreign reader:
//!
//! ```
//! use tessera_testkit::{acme, bolt, AcmeToken, BoltToken, TestEnv};
//!
//! let mut env = TestEnv::with_registered_projects();
//!
//! // acme initializes its storage once.
//! let ns = env
//!     .namespaces
//!     .create_namespace(&mut env.ctx, &env.identity, AcmeToken::mint(), None)?;
//! env.namespaces
//!     .patch_data(&mut env.ctx, &env.identity, ns, 42u64, AcmeToken::mint())?;
//!
//! // acme delegates read access to bolt for an hour.
//! env.authorization.grant(
//!     &mut env.ctx,
//!     &env.identity,
//!     AcmeToken::mint(),
//!     acme(),
//!     acme(),
//!     bolt(),
//!     Some(3_600),
//! )?;
//!
//! // bolt brackets its read with a checkout/return pair.
//! let (value, voucher) = env.namespaces.get_data_by_project::<u64, _>(
//!     &mut env.ctx,
//!     &env.identity,
//!     &env.authorization,
//!     ns,
//!     acme(),
//!     BoltToken::mint(),
//! )?;
//! assert_eq!(value, 42);
//! env.namespaces.return_data(value, voucher)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Namespace error types
pub mod errors;

/// Namespace handles and tree nodes
pub mod node;

/// Data slots and checkout vouchers
pub mod slot;

/// The namespace store
pub mod store;

pub use errors::{NamespaceError, Result};
pub use node::{NamespaceId, NamespaceNode};
pub use slot::Voucher;
pub use store::NamespaceStore;
