//! Delegation lifecycle flows and properties
//!
//! Scenario tests over a full fixture environment, plus property tests for
//! the expiry boundary and for the consistency of the secondary indexes
//! under arbitrary grant/revoke/toggle sequences.

use assert_matches::assert_matches;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;
use tessera_authorization::{AuthorizationError, Result};
use tessera_core::{Address, Event};
use tessera_testkit::{acme, bolt, cobalt, AcmeToken, BoltToken, CobaltToken, TestEnv};

#[test]
fn full_delegation_lifecycle() {
    let mut env = TestEnv::with_registered_projects();

    // acme delegates to bolt for an hour.
    env.authorization
        .grant(
            &mut env.ctx,
            &env.identity,
            AcmeToken::mint(),
            acme(),
            acme(),
            bolt(),
            Some(3_600),
        )
        .unwrap();

    assert!(env
        .authorization
        .verify_read(&mut env.ctx, &env.identity, BoltToken::mint(), acme())
        .unwrap());

    // The metered usage path emits its own event.
    env.authorization
        .use_authorization(&mut env.ctx, &env.identity, acme(), BoltToken::mint())
        .unwrap();
    assert!(env.ctx.events().iter().any(|event| matches!(
        event,
        Event::AuthorizationUsed { authorizer, authorized }
            if *authorizer == acme() && *authorized == bolt()
    )));

    // Revocation is immediate; a fresh grant starts a new record.
    env.authorization
        .revoke(&mut env.ctx, &env.identity, AcmeToken::mint(), bolt())
        .unwrap();
    assert!(!env
        .authorization
        .verify_read(&mut env.ctx, &env.identity, BoltToken::mint(), acme())
        .unwrap());
    assert_matches!(
        env.authorization
            .use_authorization(&mut env.ctx, &env.identity, acme(), BoltToken::mint()),
        Err(AuthorizationError::Unauthorized)
    );

    env.authorization
        .grant(
            &mut env.ctx,
            &env.identity,
            AcmeToken::mint(),
            acme(),
            acme(),
            bolt(),
            None,
        )
        .unwrap();
    let record = env.authorization.grant_record(acme(), bolt()).unwrap();
    assert_eq!(record.expires_at, None);
    assert!(!record.write);
}

#[test]
fn grants_are_directional() {
    let mut env = TestEnv::with_registered_projects();
    env.authorization
        .grant(
            &mut env.ctx,
            &env.identity,
            AcmeToken::mint(),
            acme(),
            acme(),
            bolt(),
            None,
        )
        .unwrap();

    // bolt may read acme's data, not the other way around.
    assert!(env
        .authorization
        .verify_read(&mut env.ctx, &env.identity, BoltToken::mint(), acme())
        .unwrap());
    assert!(!env
        .authorization
        .verify_read(&mut env.ctx, &env.identity, AcmeToken::mint(), bolt())
        .unwrap());
}

#[test]
fn disabled_identity_cannot_grant_or_check() {
    let mut env = TestEnv::with_registered_projects();
    env.identity
        .set_enabled::<AcmeToken>(&mut env.ctx, TestEnv::admin(), false)
        .unwrap();

    assert_matches!(
        env.authorization.grant(
            &mut env.ctx,
            &env.identity,
            AcmeToken::mint(),
            acme(),
            acme(),
            bolt(),
            None,
        ),
        Err(AuthorizationError::Identity(_))
    );
}

const PROJECTS: [fn() -> Address; 3] = [acme, bolt, cobalt];

fn do_grant(env: &mut TestEnv, from: u8, to: u8, duration_secs: Option<u64>) -> Result<()> {
    let authorizer = PROJECTS[from as usize]();
    let authorized = PROJECTS[to as usize]();
    match from {
        0 => env.authorization.grant(
            &mut env.ctx,
            &env.identity,
            AcmeToken::mint(),
            authorizer,
            authorizer,
            authorized,
            duration_secs,
        ),
        1 => env.authorization.grant(
            &mut env.ctx,
            &env.identity,
            BoltToken::mint(),
            authorizer,
            authorizer,
            authorized,
            duration_secs,
        ),
        _ => env.authorization.grant(
            &mut env.ctx,
            &env.identity,
            CobaltToken::mint(),
            authorizer,
            authorizer,
            authorized,
            duration_secs,
        ),
    }
}

fn do_revoke(env: &mut TestEnv, from: u8, to: u8) -> Result<()> {
    let authorized = PROJECTS[to as usize]();
    match from {
        0 => env
            .authorization
            .revoke(&mut env.ctx, &env.identity, AcmeToken::mint(), authorized),
        1 => env
            .authorization
            .revoke(&mut env.ctx, &env.identity, BoltToken::mint(), authorized),
        _ => env
            .authorization
            .revoke(&mut env.ctx, &env.identity, CobaltToken::mint(), authorized),
    }
}

#[derive(Debug, Clone)]
enum Op {
    Grant { from: u8, to: u8, duration: Option<u64> },
    Revoke { from: u8, to: u8 },
    Toggle { from: u8, to: u8, enabled: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..3u8, 0..3u8, proptest::option::of(0..10_000u64))
            .prop_map(|(from, to, duration)| Op::Grant { from, to, duration }),
        (0..3u8, 0..3u8).prop_map(|(from, to)| Op::Revoke { from, to }),
        (0..3u8, 0..3u8, any::<bool>())
            .prop_map(|(from, to, enabled)| Op::Toggle { from, to, enabled }),
    ]
}

proptest! {
    /// A grant of duration D issued at t0 verifies for all t <= t0 + D and
    /// fails for all t > t0 + D.
    #[test]
    fn expiry_boundary_is_inclusive(duration in 0..5_000u64, offset in 0..10_000u64) {
        let mut env = TestEnv::with_registered_projects();
        do_grant(&mut env, 0, 1, Some(duration)).unwrap();

        env.clock.advance(offset);
        let allowed = env
            .authorization
            .verify_read(&mut env.ctx, &env.identity, BoltToken::mint(), acme())
            .unwrap();
        prop_assert_eq!(allowed, offset <= duration);
    }

    /// After any sequence of grants, revokes, and toggles the primary store
    /// and both secondary indexes agree: each surviving grant is locatable by
    /// pair, and the per-address query surfaces exactly the surviving grants.
    #[test]
    fn indexes_stay_consistent_under_arbitrary_sequences(
        ops in proptest::collection::vec(op_strategy(), 0..40)
    ) {
        let mut env = TestEnv::with_registered_projects();
        // Model of surviving grants: (from, to) -> is_active.
        let mut model: HashMap<(u8, u8), bool> = HashMap::new();

        for op in ops {
            match op {
                Op::Grant { from, to, duration } => {
                    let result = do_grant(&mut env, from, to, duration);
                    if from == to {
                        prop_assert!(result.is_err(), "self grant must fail");
                    } else if model.contains_key(&(from, to)) {
                        prop_assert!(result.is_err(), "duplicate grant must fail");
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert((from, to), true);
                    }
                }
                Op::Revoke { from, to } => {
                    let result = do_revoke(&mut env, from, to);
                    if model.remove(&(from, to)).is_some() {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert!(result.is_err(), "revoking a missing grant must fail");
                    }
                }
                Op::Toggle { from, to, enabled } => {
                    let result = env.authorization.set_enabled(
                        &mut env.ctx,
                        TestEnv::admin(),
                        PROJECTS[from as usize](),
                        PROJECTS[to as usize](),
                        enabled,
                    );
                    if let Some(active) = model.get_mut(&(from, to)) {
                        prop_assert!(result.is_ok());
                        *active = enabled;
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }
        }

        for from in 0..3u8 {
            for to in 0..3u8 {
                let record = env
                    .authorization
                    .grant_record(PROJECTS[from as usize](), PROJECTS[to as usize]());
                match model.get(&(from, to)) {
                    Some(active) => {
                        let record = record.ok_or_else(|| {
                            TestCaseError::fail("grant missing from primary store")
                        })?;
                        prop_assert_eq!(record.is_active, *active);
                    }
                    None => prop_assert!(record.is_none()),
                }
            }
        }
        for (index, project) in PROJECTS.iter().enumerate() {
            let expected_issued = model.keys().filter(|(f, _)| *f as usize == index).count();
            let expected_held = model.keys().filter(|(_, t)| *t as usize == index).count();
            prop_assert_eq!(
                env.authorization.grants_by_authorizer(project()).len(),
                expected_issued
            );
            prop_assert_eq!(
                env.authorization.grants_by_authorized(project()).len(),
                expected_held
            );
        }
    }
}
