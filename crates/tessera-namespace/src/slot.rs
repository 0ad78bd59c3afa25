//! Data slots and checkout vouchers
//!
//! A slot is either `Present` (holding its value) or `CheckedOut` (the value
//! is in a caller's hands). Keeping an explicit `CheckedOut` marker, rather
//! than removing the slot outright, lets the store refuse a patch while a
//! checkout is outstanding instead of silently orphaning the voucher.

use crate::node::NamespaceId;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

/// Key of a slot: one per (namespace, data type) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotKey {
    pub namespace: NamespaceId,
    pub data_type: TypeId,
}

impl SlotKey {
    pub(crate) fn for_type<D: 'static>(namespace: NamespaceId) -> Self {
        Self {
            namespace,
            data_type: TypeId::of::<D>(),
        }
    }
}

/// Storage state of one typed data slot.
pub(crate) enum Slot {
    /// The value is attached and readable.
    Present(Box<dyn Any + Send>),
    /// The value is detached; a voucher for it is outstanding.
    CheckedOut,
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Present(_) => f.write_str("Present"),
            Slot::CheckedOut => f.write_str("CheckedOut"),
        }
    }
}

/// One-shot receipt for a checked-out slot.
///
/// A voucher binds the detached value to its namespace and data type. It
/// cannot be cloned or serialized, and redemption consumes it, so a slot can
/// be re-attached exactly once. A voucher that is dropped unredeemed strands
/// its slot in the checked-out state permanently; there is no timeout or
/// forced reclaim.
pub struct Voucher<D> {
    namespace: NamespaceId,
    _slot: PhantomData<fn(D) -> D>,
}

impl<D> Voucher<D> {
    pub(crate) fn bind(namespace: NamespaceId) -> Self {
        Self {
            namespace,
            _slot: PhantomData,
        }
    }

    /// The namespace this voucher's slot lives in.
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }
}

impl<D> fmt::Debug for Voucher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Voucher")
            .field("namespace", &self.namespace)
            .finish()
    }
}
