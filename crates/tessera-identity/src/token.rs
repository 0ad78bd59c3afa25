//! Capability tokens
//!
//! A capability token is an ephemeral value of a project-defined type. The
//! type, not the value, carries the identity: the registry keys records by
//! [`TypeId`](std::any::TypeId), and [`ProjectToken::project_address`] binds
//! the type to the address of the project that declares it.

use tessera_core::Address;

/// A project's capability-token type.
///
/// Implementing this trait declares "values of this type speak for the
/// project at [`project_address`](Self::project_address)". For the claim to
/// mean anything, the implementing type must keep its constructor private to
/// the declaring module: if arbitrary code can mint instances, the token
/// proves nothing.
///
/// Tokens are consumed by value on every verification call and must never be
/// persisted; a conforming type derives neither `Clone` nor `Serialize`.
///
/// ```
/// use tessera_core::Address;
/// use tessera_identity::ProjectToken;
///
/// pub struct PaymentsToken(());
///
/// impl PaymentsToken {
///     // Only this module can mint.
///     fn mint() -> Self {
///         Self(())
///     }
/// }
///
/// impl ProjectToken for PaymentsToken {
///     fn project_address() -> Address {
///         Address::derived("payments")
///     }
/// }
/// # let _ = PaymentsToken::mint();
/// # let _ = PaymentsToken::project_address();
/// ```
pub trait ProjectToken: 'static {
    /// Address of the project that declares this token type.
    fn project_address() -> Address;
}
