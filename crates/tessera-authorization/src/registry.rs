//! Registry of delegated read grants
//!
//! Primary records are keyed by [`GrantKey`]; two secondary indexes map each
//! address to the keys it participates in, serving the by-authorizer and
//! by-authorized query surface. Grant and revoke maintain all three
//! structures within the same atomic operation, and a failing operation
//! reverts any audit events it staged, so no partial mutation is observable.

use crate::errors::{AuthorizationError, Result};
use crate::grant::{AuthorizationRecord, GrantKey};
use std::collections::HashMap;
use tessera_core::{Address, Context, Event, Timestamp};
use tessera_identity::{IdentityError, IdentityRegistry, ProjectToken};
use tracing::{debug, warn};

/// Stores delegated read grants between project addresses.
pub struct AuthorizationRegistry {
    admin: Address,
    grants: HashMap<GrantKey, AuthorizationRecord>,
    by_authorized: HashMap<Address, Vec<GrantKey>>,
    by_authorizer: HashMap<Address, Vec<GrantKey>>,
}

impl AuthorizationRegistry {
    /// Create a registry administered by `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            grants: HashMap::new(),
            by_authorized: HashMap::new(),
            by_authorizer: HashMap::new(),
        }
    }

    /// The fixed administrator address.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Delegate read access from `authorizer` to `authorized`.
    ///
    /// The token must verify and resolve to `authorizer`. `project` is the
    /// granting project recorded on the grant; read checks later require it
    /// to match the project being queried. `duration_secs` of `None` makes
    /// the grant permanent; otherwise it expires `duration_secs` after now
    /// (the boundary second itself still verifies).
    ///
    /// At most one grant may exist per (authorizer, authorized) pair; a
    /// second grant fails with [`AuthorizationError::AlreadyAuthorized`]
    /// until the first is revoked.
    pub fn grant<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        authorizer: Address,
        project: Address,
        authorized: Address,
        duration_secs: Option<u64>,
    ) -> Result<()> {
        let mark = ctx.mark();
        match self.grant_inner(
            ctx,
            identity,
            token,
            authorizer,
            project,
            authorized,
            duration_secs,
        ) {
            Ok(()) => Ok(()),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn grant_inner<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        authorizer: Address,
        project: Address,
        authorized: Address,
        duration_secs: Option<u64>,
    ) -> Result<()> {
        let owner = identity.verify(ctx, token)?;
        if owner != authorizer {
            return Err(IdentityError::OwnerMismatch {
                expected: authorizer,
                actual: owner,
            }
            .into());
        }
        if authorizer == authorized {
            return Err(AuthorizationError::SelfAuthorization);
        }

        let key = GrantKey {
            authorized,
            authorizer,
        };
        if self.grants.contains_key(&key) {
            return Err(AuthorizationError::AlreadyAuthorized);
        }

        let now = ctx.now();
        let record = AuthorizationRecord {
            authorizer,
            project,
            authorized,
            created_at: now,
            expires_at: duration_secs.map(|d| now.saturating_add(d)),
            is_active: true,
            read: true,
            write: false,
        };
        debug!(grant = %key, expires_at = ?record.expires_at, "granting read access");

        self.grants.insert(key, record);
        self.by_authorized.entry(authorized).or_default().push(key);
        self.by_authorizer.entry(authorizer).or_default().push(key);
        ctx.emit(Event::AuthorizationGranted {
            authorizer,
            authorized,
        });
        Ok(())
    }

    /// Revoke the grant this token's owner issued to `authorized`.
    ///
    /// Removes the primary record and its entry in both secondary indexes.
    pub fn revoke<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        authorized: Address,
    ) -> Result<()> {
        let mark = ctx.mark();
        match self.revoke_inner(ctx, identity, token, authorized) {
            Ok(()) => Ok(()),
            Err(err) => {
                ctx.revert_to(mark);
                Err(err)
            }
        }
    }

    fn revoke_inner<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        authorized: Address,
    ) -> Result<()> {
        let authorizer = identity.verify(ctx, token)?;
        let key = GrantKey {
            authorized,
            authorizer,
        };
        if self.grants.remove(&key).is_none() {
            return Err(AuthorizationError::GrantNotFound);
        }
        Self::unindex(&mut self.by_authorized, authorized, key);
        Self::unindex(&mut self.by_authorizer, authorizer, key);

        debug!(grant = %key, "revoking read access");
        ctx.emit(Event::AuthorizationRevoked {
            authorizer,
            authorized,
        });
        Ok(())
    }

    /// Enable or disable an existing grant.
    ///
    /// Admin-gated. The indexes reference records by key, so only the primary
    /// record changes.
    pub fn set_enabled(
        &mut self,
        ctx: &mut Context,
        caller: Address,
        authorizer: Address,
        authorized: Address,
        enabled: bool,
    ) -> Result<()> {
        if caller != self.admin {
            return Err(AuthorizationError::NotAdmin);
        }
        let key = GrantKey {
            authorized,
            authorizer,
        };
        let record = self
            .grants
            .get_mut(&key)
            .ok_or(AuthorizationError::GrantNotFound)?;

        let before = record.is_active;
        record.is_active = enabled;
        debug!(grant = %key, before, after = enabled, "toggling grant");
        ctx.emit(Event::AuthorizationToggled {
            authorizer,
            authorized,
            before,
            after: enabled,
        });
        Ok(())
    }

    /// Whether `authorizer` currently permits the token's owner to read.
    ///
    /// Consumes the token through the identity registry, then evaluates the
    /// grant as a pure predicate: a missing record, a `project` field that
    /// does not match `authorizer`, a disabled or expired grant, or a grant
    /// without the read permission all yield `Ok(false)`, never an
    /// authorization error.
    pub fn verify_read<T: ProjectToken>(
        &self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        token: T,
        authorizer: Address,
    ) -> Result<bool> {
        let authorized = identity.verify(ctx, token)?;
        Ok(self.read_allowed(authorized, authorizer, ctx.now()))
    }

    /// The read predicate for callers that have already authenticated the
    /// reader. The namespace store verifies the reader's own token before
    /// delegating here, so no token is consumed on this path.
    ///
    /// Resolves the grant through the by-authorized index, matching on the
    /// recorded `project`.
    pub fn verify_read_by_project(
        &self,
        ctx: &Context,
        authorized: Address,
        project: Address,
    ) -> bool {
        let now = ctx.now();
        self.by_authorized
            .get(&authorized)
            .into_iter()
            .flatten()
            .filter_map(|key| self.grants.get(key))
            .any(|record| record.project == project && record.permits_read_at(now))
    }

    /// Exercise a grant through the metered usage path.
    ///
    /// Verifies the token, asserts the read predicate, and emits an
    /// `AuthorizationUsed` event, usage telemetry distinct from a plain
    /// check. Fails with [`AuthorizationError::Unauthorized`] when the
    /// predicate is false.
    pub fn use_authorization<T: ProjectToken>(
        &self,
        ctx: &mut Context,
        identity: &IdentityRegistry,
        authorizer: Address,
        token: T,
    ) -> Result<()> {
        let mark = ctx.mark();
        let authorized = identity.verify(ctx, token)?;
        if !self.read_allowed(authorized, authorizer, ctx.now()) {
            ctx.revert_to(mark);
            warn!(%authorizer, %authorized, "unauthorized usage attempt");
            return Err(AuthorizationError::Unauthorized);
        }
        ctx.emit(Event::AuthorizationUsed {
            authorizer,
            authorized,
        });
        Ok(())
    }

    /// Read-only access to the grant for a pair, if any.
    pub fn grant_record(
        &self,
        authorizer: Address,
        authorized: Address,
    ) -> Option<&AuthorizationRecord> {
        self.grants.get(&GrantKey {
            authorized,
            authorizer,
        })
    }

    /// All grants issued by `authorizer`.
    pub fn grants_by_authorizer(&self, authorizer: Address) -> Vec<&AuthorizationRecord> {
        self.records_for(&self.by_authorizer, authorizer)
    }

    /// All grants held by `authorized`.
    pub fn grants_by_authorized(&self, authorized: Address) -> Vec<&AuthorizationRecord> {
        self.records_for(&self.by_authorized, authorized)
    }

    fn records_for(
        &self,
        index: &HashMap<Address, Vec<GrantKey>>,
        addr: Address,
    ) -> Vec<&AuthorizationRecord> {
        index
            .get(&addr)
            .into_iter()
            .flatten()
            .filter_map(|key| self.grants.get(key))
            .collect()
    }

    fn read_allowed(&self, authorized: Address, authorizer: Address, now: Timestamp) -> bool {
        let key = GrantKey {
            authorized,
            authorizer,
        };
        match self.grants.get(&key) {
            Some(record) => record.project == authorizer && record.permits_read_at(now),
            None => false,
        }
    }

    fn unindex(index: &mut HashMap<Address, Vec<GrantKey>>, addr: Address, key: GrantKey) {
        if let Some(keys) = index.get_mut(&addr) {
            keys.retain(|k| *k != key);
            if keys.is_empty() {
                index.remove(&addr);
            }
        }
    }
}

impl std::fmt::Debug for AuthorizationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationRegistry")
            .field("admin", &self.admin)
            .field("grants", &self.grants.len())
            .finish()
    }
}
