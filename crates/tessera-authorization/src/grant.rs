//! Grant records and keys

use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_core::{Address, Timestamp};

/// Primary key of a grant: the ordered pair (authorized, authorizer).
///
/// The same composite key is stored in both secondary indexes, so a record is
/// always located unambiguously, never by scanning for field equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantKey {
    /// The project receiving access.
    pub authorized: Address,
    /// The granting project.
    pub authorizer: Address,
}

impl fmt::Display for GrantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.authorizer, self.authorized)
    }
}

/// One delegated read grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRecord {
    /// The capability owner that issued the grant.
    pub authorizer: Address,
    /// The granting project whose data is shared. Read checks require this to
    /// match the project being queried.
    pub project: Address,
    /// The project receiving access.
    pub authorized: Address,
    /// When the grant was issued.
    pub created_at: Timestamp,
    /// When the grant stops verifying; `None` means it never expires.
    pub expires_at: Option<Timestamp>,
    /// Administrator kill switch.
    pub is_active: bool,
    /// Whether reads are permitted.
    pub read: bool,
    /// Reserved; always `false`.
    pub write: bool,
}

impl AuthorizationRecord {
    /// Whether this grant permits a read at `now`.
    ///
    /// A grant is still valid at the exact expiry second; it fails strictly
    /// after it. Expired records stay in storage until revoked.
    pub fn permits_read_at(&self, now: Timestamp) -> bool {
        if !self.is_active || !self.read {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => now <= expires_at,
            None => true,
        }
    }

    /// The primary key of this record.
    pub fn key(&self) -> GrantKey {
        GrantKey {
            authorized: self.authorized,
            authorizer: self.authorizer,
        }
    }
}
