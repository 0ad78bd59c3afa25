//! Namespace handles and tree nodes
//!
//! Nodes form a forest: a node created with a parent is appended to that
//! parent's children and keeps the parent address for life; a node created
//! without one is a root. Nodes are never deleted and a parent link never
//! changes after creation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tessera_core::{Address, Timestamp};
use uuid::Uuid;

/// Handle of a namespace node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceId(pub Uuid);

impl NamespaceId {
    /// Allocate a fresh handle.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NamespaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ns-{}", self.0)
    }
}

impl From<Uuid> for NamespaceId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// One node in the namespace forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceNode {
    /// The project that created and owns this namespace.
    pub owner: Address,
    /// Parent node, fixed at creation. `None` for a root.
    pub parent: Option<NamespaceId>,
    /// Child nodes, in creation order.
    pub children: Vec<NamespaceId>,
    /// When the node was created.
    pub created_at: Timestamp,
    /// Last structural or data change.
    pub updated_at: Timestamp,
    /// Free-form metadata, owner-writable.
    pub attributes: BTreeMap<String, String>,
    /// Reserved for future instrumentation; never updated.
    pub access_count: u64,
    /// Reserved for future instrumentation; never updated.
    pub last_accessed: Option<Timestamp>,
}

impl NamespaceNode {
    pub(crate) fn new(owner: Address, parent: Option<NamespaceId>, now: Timestamp) -> Self {
        Self {
            owner,
            parent,
            children: Vec::new(),
            created_at: now,
            updated_at: now,
            attributes: BTreeMap::new(),
            access_count: 0,
            last_accessed: None,
        }
    }

    /// Whether this node is a root of the forest.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
