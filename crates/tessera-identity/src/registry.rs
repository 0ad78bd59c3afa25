//! Registry of capability-token identities
//!
//! One record per token type, keyed by `TypeId`. Records are created through
//! admin-gated registration, mutated only by the admin-gated enable/disable
//! toggle, and never deleted.

use crate::errors::{IdentityError, Result};
use crate::token::ProjectToken;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::collections::HashMap;
use tessera_core::{Address, Context, Event, Timestamp};
use tracing::debug;

/// The registered identity of one capability type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Address of the project that declares the token type.
    pub owner: Address,
    /// When the identity was registered.
    pub registered_at: Timestamp,
    /// Whether verification currently succeeds for this identity.
    pub is_active: bool,
    /// Operator-facing key recorded at registration and echoed in audit
    /// events.
    pub api_key: String,
}

/// Maps capability-token types to their owning projects.
pub struct IdentityRegistry {
    admin: Address,
    records: HashMap<TypeId, IdentityRecord>,
}

impl IdentityRegistry {
    /// Create a registry administered by `admin`.
    ///
    /// The administrator address is fixed for the life of the registry.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            records: HashMap::new(),
        }
    }

    /// The fixed administrator address.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Register the capability type `T`, deriving the owner from the type's
    /// declaring project.
    ///
    /// Admin-gated. Fails with [`IdentityError::AlreadyRegistered`] if `T`
    /// already has a record; the existing record is left untouched.
    pub fn register<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        caller: Address,
        api_key: impl Into<String>,
    ) -> Result<()> {
        if caller != self.admin {
            return Err(IdentityError::NotAdmin);
        }
        if self.records.contains_key(&TypeId::of::<T>()) {
            return Err(IdentityError::AlreadyRegistered);
        }

        let record = IdentityRecord {
            owner: T::project_address(),
            registered_at: ctx.now(),
            is_active: true,
            api_key: api_key.into(),
        };
        debug!(owner = %record.owner, api_key = %record.api_key, "registering identity");
        ctx.emit(Event::IdentityRegistered {
            owner: record.owner,
            api_key: record.api_key.clone(),
        });
        ctx.emit(Event::TokenConsumed {
            api_key: record.api_key.clone(),
        });
        self.records.insert(TypeId::of::<T>(), record);
        Ok(())
    }

    /// Verify a capability token, consuming it, and return the owner address
    /// of its declaring project.
    ///
    /// Every successful verification appends a `TokenConsumed` audit event,
    /// including verifications performed for pure reads. Identities have no
    /// expiry of their own; only the enabled flag gates them.
    pub fn verify<T: ProjectToken>(&self, ctx: &mut Context, _token: T) -> Result<Address> {
        let record = self
            .records
            .get(&TypeId::of::<T>())
            .ok_or(IdentityError::NotRegistered)?;
        if !record.is_active {
            return Err(IdentityError::IdentityDisabled);
        }
        ctx.emit(Event::TokenConsumed {
            api_key: record.api_key.clone(),
        });
        Ok(record.owner)
    }

    /// Enable or disable the identity of `T`.
    ///
    /// Admin-gated. Emits an `IdentityToggled` event carrying the before and
    /// after values of the flag.
    pub fn set_enabled<T: ProjectToken>(
        &mut self,
        ctx: &mut Context,
        caller: Address,
        enabled: bool,
    ) -> Result<()> {
        if caller != self.admin {
            return Err(IdentityError::NotAdmin);
        }
        let record = self
            .records
            .get_mut(&TypeId::of::<T>())
            .ok_or(IdentityError::NotRegistered)?;

        let before = record.is_active;
        record.is_active = enabled;
        debug!(owner = %record.owner, before, after = enabled, "toggling identity");
        ctx.emit(Event::IdentityToggled {
            owner: record.owner,
            api_key: record.api_key.clone(),
            before,
            after: enabled,
        });
        Ok(())
    }

    /// Whether `T` has a record, active or not.
    pub fn is_registered<T: ProjectToken>(&self) -> bool {
        self.records.contains_key(&TypeId::of::<T>())
    }

    /// Read-only access to the record of `T`, if registered.
    ///
    /// Consumes no token and emits no event.
    pub fn record<T: ProjectToken>(&self) -> Option<&IdentityRecord> {
        self.records.get(&TypeId::of::<T>())
    }
}

impl std::fmt::Debug for IdentityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityRegistry")
            .field("admin", &self.admin)
            .field("records", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_core::ManualClock;

    struct AlphaToken(());

    impl AlphaToken {
        fn mint() -> Self {
            Self(())
        }
    }

    impl ProjectToken for AlphaToken {
        fn project_address() -> Address {
            Address::derived("alpha")
        }
    }

    // Never registered; only its type identity is used.
    struct BetaToken;

    impl ProjectToken for BetaToken {
        fn project_address() -> Address {
            Address::derived("beta")
        }
    }

    fn admin() -> Address {
        Address::derived("admin")
    }

    fn setup() -> (Context, IdentityRegistry) {
        let ctx = Context::new(Arc::new(ManualClock::at(1_000)));
        let registry = IdentityRegistry::new(admin());
        (ctx, registry)
    }

    #[test]
    fn register_then_verify_returns_owner() {
        let (mut ctx, mut registry) = setup();
        registry
            .register::<AlphaToken>(&mut ctx, admin(), "alpha-key")
            .unwrap();

        let owner = registry.verify(&mut ctx, AlphaToken::mint()).unwrap();
        assert_eq!(owner, Address::derived("alpha"));
    }

    #[test]
    fn register_requires_admin() {
        let (mut ctx, mut registry) = setup();
        let err = registry
            .register::<AlphaToken>(&mut ctx, Address::derived("mallory"), "alpha-key")
            .unwrap_err();
        assert_eq!(err, IdentityError::NotAdmin);
        assert!(!registry.is_registered::<AlphaToken>());
    }

    #[test]
    fn duplicate_registration_leaves_first_record_unchanged() {
        let (mut ctx, mut registry) = setup();
        registry
            .register::<AlphaToken>(&mut ctx, admin(), "first")
            .unwrap();
        let err = registry
            .register::<AlphaToken>(&mut ctx, admin(), "second")
            .unwrap_err();
        assert_eq!(err, IdentityError::AlreadyRegistered);
        assert_eq!(registry.record::<AlphaToken>().unwrap().api_key, "first");
    }

    #[test]
    fn verify_unregistered_type_fails() {
        let (mut ctx, registry) = setup();
        let err = registry.verify(&mut ctx, AlphaToken::mint()).unwrap_err();
        assert_eq!(err, IdentityError::NotRegistered);
    }

    #[test]
    fn disabled_identity_fails_verification_until_reenabled() {
        let (mut ctx, mut registry) = setup();
        registry
            .register::<AlphaToken>(&mut ctx, admin(), "alpha-key")
            .unwrap();

        registry
            .set_enabled::<AlphaToken>(&mut ctx, admin(), false)
            .unwrap();
        let err = registry.verify(&mut ctx, AlphaToken::mint()).unwrap_err();
        assert_eq!(err, IdentityError::IdentityDisabled);

        registry
            .set_enabled::<AlphaToken>(&mut ctx, admin(), true)
            .unwrap();
        assert!(registry.verify(&mut ctx, AlphaToken::mint()).is_ok());
    }

    #[test]
    fn toggle_requires_admin_and_existing_record() {
        let (mut ctx, mut registry) = setup();
        assert_eq!(
            registry
                .set_enabled::<AlphaToken>(&mut ctx, Address::derived("mallory"), false)
                .unwrap_err(),
            IdentityError::NotAdmin
        );
        assert_eq!(
            registry
                .set_enabled::<BetaToken>(&mut ctx, admin(), false)
                .unwrap_err(),
            IdentityError::NotRegistered
        );
    }

    #[test]
    fn every_verification_appends_a_consumption_event() {
        let (mut ctx, mut registry) = setup();
        registry
            .register::<AlphaToken>(&mut ctx, admin(), "alpha-key")
            .unwrap();
        let base = consumed_count(&ctx);

        registry.verify(&mut ctx, AlphaToken::mint()).unwrap();
        registry.verify(&mut ctx, AlphaToken::mint()).unwrap();
        assert_eq!(consumed_count(&ctx), base + 2);
    }

    #[test]
    fn failed_verification_emits_nothing() {
        let (mut ctx, registry) = setup();
        let _ = registry.verify(&mut ctx, AlphaToken::mint());
        assert!(ctx.events().is_empty());
    }

    fn consumed_count(ctx: &Context) -> usize {
        ctx.events()
            .iter()
            .filter(|e| matches!(e, Event::TokenConsumed { .. }))
            .count()
    }
}
