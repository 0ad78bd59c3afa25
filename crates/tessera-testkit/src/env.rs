//! The assembled test environment

use crate::projects::{AcmeToken, BoltToken, CobaltToken};
use std::sync::Arc;
use tessera_authorization::AuthorizationRegistry;
use tessera_core::{Address, Context, ManualClock};
use tessera_identity::IdentityRegistry;
use tessera_namespace::NamespaceStore;

/// Starting time of every test environment's clock.
pub const BASE_TIME: u64 = 1_000_000;

/// A full deployment under a manual clock: both registries, a namespace
/// store, and a context, with the three fixture projects registered.
pub struct TestEnv {
    /// Handle for driving time forward.
    pub clock: Arc<ManualClock>,
    /// The execution context under test.
    pub ctx: Context,
    /// Identity registry administered by [`TestEnv::admin`].
    pub identity: IdentityRegistry,
    /// Authorization registry administered by [`TestEnv::admin`].
    pub authorization: AuthorizationRegistry,
    /// An empty namespace store.
    pub namespaces: NamespaceStore,
}

impl TestEnv {
    /// The fixture administrator address.
    pub fn admin() -> Address {
        Address::derived("admin")
    }

    /// An environment with empty registries at [`BASE_TIME`].
    pub fn new() -> Self {
        crate::init_tracing();
        let clock = Arc::new(ManualClock::at(BASE_TIME));
        let ctx = Context::new(clock.clone());
        Self {
            clock,
            ctx,
            identity: IdentityRegistry::new(Self::admin()),
            authorization: AuthorizationRegistry::new(Self::admin()),
            namespaces: NamespaceStore::new(),
        }
    }

    /// An environment with the acme, bolt, and cobalt identities registered.
    pub fn with_registered_projects() -> Self {
        let mut env = Self::new();
        env.identity
            .register::<AcmeToken>(&mut env.ctx, Self::admin(), "acme-key")
            .unwrap_or_else(|err| panic!("registering acme fixture: {err}"));
        env.identity
            .register::<BoltToken>(&mut env.ctx, Self::admin(), "bolt-key")
            .unwrap_or_else(|err| panic!("registering bolt fixture: {err}"));
        env.identity
            .register::<CobaltToken>(&mut env.ctx, Self::admin(), "cobalt-key")
            .unwrap_or_else(|err| panic!("registering cobalt fixture: {err}"));
        env
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
