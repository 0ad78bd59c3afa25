//! The namespace store
//!
//! Owns the namespace forest and every data slot in it. Read access by a
//! foreign project is mediated by the authorization registry; reads and
//! structural changes by the owning project are mediated by the identity
//! registry alone. Both registries are passed in explicitly per call.

use crate::errors::{NamespaceError, Result};
use crate::node::{NamespaceId, NamespaceNode};
use crate::slot::{Slot, SlotKey, Voucher};
use std::collections::HashMap;
use tessera_authorization::AuthorizationRegistry;
use tessera_core::{Address, Context};
use tessera_identity::{IdentityError, IdentityRegistry, ProjectToken};
use tracing::{debug, warn};

/// Forest of namespace nodes and their typed data slots.
#[derive(Default)]
pub struct NamespaceStore {
    nodes: HashMap<NamespaceId, NamespaceNode>,
    slots: HashMap<SlotKey, Slot>,
}

impl NamespaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace owned by the token's project.
    ///
    /// With a parent handle the new node is appended to that parent's
    /// children; without one it is a root. There is no cap on tree depth or
    /// fan-out, and a node's parent never changes afterwards.
    pub fn create_namespace<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        parent: Option<NamespaceId>,
    ) -> Result<NamespaceId> {
        let mark = ctx.mark();
        match self.create_namespace_inner(ctx, identity, token, parent) {
            Ok(id) => Ok(id),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn create_namespace_inner<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        parent: Option<NamespaceId>,
    ) -> Result<NamespaceId> {
        let owner = identity.verify(ctx, token)?;
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(NamespaceError::NamespaceNotFound);
            }
        }

        let id = NamespaceId::new();
        let now = ctx.now();
        self.nodes.insert(id, NamespaceNode::new(owner, parent, now));
        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent_id) {
                parent_node.children.push(id);
                parent_node.updated_at = now;
            }
        }
        debug!(namespace = %id, %owner, ?parent, "created namespace");
        Ok(id)
    }

    /// Attach a value of type `D` at the namespace.
    ///
    /// At most one slot per (namespace, data type) pair may exist: a present
    /// slot fails with [`NamespaceError::SlotAlreadyPresent`], and a slot
    /// with an outstanding checkout fails with
    /// [`NamespaceError::CheckoutOutstanding`] rather than orphaning the
    /// in-flight voucher.
    pub fn patch_data<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        value: D,
        token: T,
    ) -> Result<()>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        let mark = ctx.mark();
        match self.patch_data_inner(ctx, identity, namespace, value, token) {
            Ok(()) => Ok(()),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn patch_data_inner<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        value: D,
        token: T,
    ) -> Result<()>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        identity.verify(ctx, token)?;
        if !self.nodes.contains_key(&namespace) {
            return Err(NamespaceError::NamespaceNotFound);
        }

        let key = SlotKey::for_type::<D>(namespace);
        match self.slots.get(&key) {
            Some(Slot::Present(_)) => return Err(NamespaceError::SlotAlreadyPresent),
            Some(Slot::CheckedOut) => {
                warn!(namespace = %namespace, "patch refused: checkout outstanding");
                return Err(NamespaceError::CheckoutOutstanding);
            }
            None => {}
        }

        self.slots.insert(key, Slot::Present(Box::new(value)));
        let now = ctx.now();
        if let Some(node) = self.nodes.get_mut(&namespace) {
            node.updated_at = now;
        }
        debug!(namespace = %namespace, "patched data slot");
        Ok(())
    }

    /// Check out a value of type `D` as the namespace's owner.
    ///
    /// The token's project must own the namespace. On success the slot is
    /// detached and the value is returned together with a one-shot
    /// [`Voucher`]; a second checkout before redemption fails immediately
    /// with [`NamespaceError::SlotCheckedOut`].
    pub fn get_data_by_witness<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        token: T,
    ) -> Result<(D, Voucher<D>)>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        let mark = ctx.mark();
        match self.get_by_witness_inner(ctx, identity, namespace, token) {
            Ok(out) => Ok(out),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn get_by_witness_inner<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        token: T,
    ) -> Result<(D, Voucher<D>)>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        let owner = identity.verify(ctx, token)?;
        let node = self
            .nodes
            .get(&namespace)
            .ok_or(NamespaceError::NamespaceNotFound)?;
        if node.owner != owner {
            return Err(IdentityError::OwnerMismatch {
                expected: node.owner,
                actual: owner,
            }
            .into());
        }
        self.detach::<D>(namespace)
    }

    /// Check out a value of type `D` as a foreign project.
    ///
    /// `project` must be the namespace's recorded owner, and an active,
    /// unexpired, read-permitted grant from `project` to the token's project
    /// must exist in the authorization registry. On success the slot is
    /// detached exactly as on the witness path.
    pub fn get_data_by_project<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        authorization: &AuthorizationRegistry,
        namespace: NamespaceId,
        project: Address,
        token: T,
    ) -> Result<(D, Voucher<D>)>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        let mark = ctx.mark();
        match self.get_by_project_inner(ctx, identity, authorization, namespace, project, token) {
            Ok(out) => Ok(out),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn get_by_project_inner<D, T>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        authorization: &AuthorizationRegistry,
        namespace: NamespaceId,
        project: Address,
        token: T,
    ) -> Result<(D, Voucher<D>)>
    where
        D: Send + 'static,
        T: ProjectToken,
    {
        let node = self
            .nodes
            .get(&namespace)
            .ok_or(NamespaceError::NamespaceNotFound)?;
        if node.owner != project {
            return Err(NamespaceError::ProjectMismatch {
                claimed: project,
                owner: node.owner,
            });
        }

        let reader = identity.verify(ctx, token)?;
        if !authorization.verify_read_by_project(ctx, reader, project) {
            warn!(namespace = %namespace, %reader, %project, "cross-project read refused");
            return Err(NamespaceError::NoPermission);
        }
        self.detach::<D>(namespace)
    }

    /// Redeem a voucher, re-attaching the value at its bound slot.
    ///
    /// The slot returns to the present state and a subsequent checkout will
    /// retrieve this value. Redemption consumes the voucher; there is no
    /// other way out of the checked-out state.
    pub fn return_data<D: Send + 'static>(&mut self, value: D, voucher: Voucher<D>) -> Result<()> {
        let key = SlotKey::for_type::<D>(voucher.namespace());
        let slot = self
            .slots
            .get_mut(&key)
            .ok_or(NamespaceError::VoucherMismatch)?;
        match slot {
            Slot::CheckedOut => {
                *slot = Slot::Present(Box::new(value));
                debug!(namespace = %voucher.namespace(), "returned data slot");
                Ok(())
            }
            Slot::Present(_) => Err(NamespaceError::VoucherMismatch),
        }
    }

    /// Owner of a namespace.
    pub fn owner_address(&self, namespace: NamespaceId) -> Result<Address> {
        self.nodes
            .get(&namespace)
            .map(|node| node.owner)
            .ok_or(NamespaceError::NamespaceNotFound)
    }

    /// Read-only access to a node.
    pub fn node(&self, namespace: NamespaceId) -> Option<&NamespaceNode> {
        self.nodes.get(&namespace)
    }

    /// Children of a namespace, in creation order.
    pub fn children(&self, namespace: NamespaceId) -> Result<&[NamespaceId]> {
        self.nodes
            .get(&namespace)
            .map(|node| node.children.as_slice())
            .ok_or(NamespaceError::NamespaceNotFound)
    }

    /// Parent of a namespace, `None` for a root.
    pub fn parent(&self, namespace: NamespaceId) -> Result<Option<NamespaceId>> {
        self.nodes
            .get(&namespace)
            .map(|node| node.parent)
            .ok_or(NamespaceError::NamespaceNotFound)
    }

    /// Set an attribute on a namespace the token's project owns.
    pub fn set_attribute<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        key: impl Into<String>,
        value: impl Into<String>,
        token: T,
    ) -> Result<()> {
        let mark = ctx.mark();
        match self.set_attribute_inner(ctx, identity, namespace, key.into(), value.into(), token) {
            Ok(()) => Ok(()),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn set_attribute_inner<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        namespace: NamespaceId,
        key: String,
        value: String,
        token: T,
    ) -> Result<()> {
        let owner = identity.verify(ctx, token)?;
        let node = self
            .nodes
            .get_mut(&namespace)
            .ok_or(NamespaceError::NamespaceNotFound)?;
        if node.owner != owner {
            return Err(IdentityError::OwnerMismatch {
                expected: node.owner,
                actual: owner,
            }
            .into());
        }
        node.attributes.insert(key, value);
        node.updated_at = ctx.now();
        Ok(())
    }

    /// Read an attribute of a namespace.
    pub fn attribute(&self, namespace: NamespaceId, key: &str) -> Result<Option<&str>> {
        self.nodes
            .get(&namespace)
            .map(|node| node.attributes.get(key).map(String::as_str))
            .ok_or(NamespaceError::NamespaceNotFound)
    }

    fn detach<D: Send + 'static>(&mut self, namespace: NamespaceId) -> Result<(D, Voucher<D>)> {
        let key = SlotKey::for_type::<D>(namespace);
        let slot = self
            .slots
            .get_mut(&key)
            .ok_or(NamespaceError::SlotMissing)?;
        match std::mem::replace(slot, Slot::CheckedOut) {
            Slot::Present(boxed) => match boxed.downcast::<D>() {
                Ok(value) => {
                    debug!(namespace = %namespace, "checked out data slot");
                    Ok((*value, Voucher::bind(namespace)))
                }
                Err(boxed) => {
                    // The key carries the slot's TypeId, so a stored value is
                    // always a D; restore the slot if that ever fails to hold.
                    *slot = Slot::Present(boxed);
                    Err(NamespaceError::SlotMissing)
                }
            },
            Slot::CheckedOut => Err(NamespaceError::SlotCheckedOut),
        }
    }
}

impl std::fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceStore")
            .field("nodes", &self.nodes.len())
            .field("slots", &self.slots.len())
            .finish()
    }
}
