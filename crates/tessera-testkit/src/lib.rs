//! # Tessera Testkit
//!
//! Shared fixtures for the Tessera crates' tests: three fixture projects with
//! their capability tokens, a manual-clock environment bundling the
//! registries and the namespace store, and small event-counting helpers.
//!
//! The fixture tokens deliberately export their `mint` constructors: the
//! testkit is their declaring module, and handing tests the minting privilege
//! is exactly the trust-boundary contract a real project honors for its own
//! code.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The assembled test environment
pub mod env;

/// Fixture projects and their capability tokens
pub mod projects;

pub use env::{TestEnv, BASE_TIME};
pub use projects::{acme, bolt, cobalt, AcmeToken, BoltToken, CobaltToken};

use tessera_core::{Context, Event};

/// Number of `TokenConsumed` events in the sink so far.
pub fn token_consumptions(ctx: &Context) -> usize {
    ctx.events()
        .iter()
        .filter(|event| matches!(event, Event::TokenConsumed { .. }))
        .count()
}

/// Initialize tracing output for a test process.
///
/// Honors `RUST_LOG` and writes through the test writer so output surfaces
/// only for failing tests. Safe to call from every test; later calls are
/// no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
