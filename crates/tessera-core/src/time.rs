//! Timestamps and clock sources
//!
//! Tessera timestamps are whole seconds since the Unix epoch. All expiry is
//! evaluated lazily against a clock read at check time; nothing in the core
//! sweeps or reaps expired state, so the only requirement on a clock is that
//! it does not run backwards between related checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create a timestamp from whole seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The inner seconds value.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp advanced by `secs`, saturating at the maximum.
    pub fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

/// A source of the current time.
///
/// Registries never read the system clock directly; the deployment injects a
/// clock into its [`Context`](crate::Context) once, and tests substitute a
/// [`ManualClock`].
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(since_epoch.as_secs())
    }
}

/// A clock that only moves when told to.
///
/// Shared by handle: tests keep one `Arc<ManualClock>` to drive time forward
/// while the context under test holds another.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// A manual clock starting at `secs`.
    pub fn at(secs: u64) -> Self {
        Self {
            now: AtomicU64::new(secs),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, secs: u64) {
        self.now.store(secs, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.now.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        assert_eq!(clock.now(), Timestamp(1_000));
        clock.advance(30);
        assert_eq!(clock.now(), Timestamp(1_030));
        clock.set(500);
        assert_eq!(clock.now(), Timestamp(500));
    }

    #[test]
    fn saturating_add_caps_at_max() {
        let t = Timestamp(u64::MAX - 1);
        assert_eq!(t.saturating_add(10), Timestamp(u64::MAX));
    }
}
