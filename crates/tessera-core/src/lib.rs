//! # Tessera Core
//!
//! Foundation types for the Tessera access-control and data-sharing layer:
//! project addresses, timestamps and clocks, audit events, and the execution
//! context that every registry operation runs against.
//!
//! This crate is pure synchronous domain logic. It holds no locks, spawns no
//! tasks, and keeps no ambient global state: callers construct a [`Context`]
//! and pass it, together with the registry handles, into every operation. The
//! surrounding execution substrate is responsible for linearizing conflicting
//! calls; within the core each operation is a single atomic unit of work.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Project and account addresses
pub mod address;

/// Execution context: clock plus append-only event sink
pub mod context;

/// Audit events emitted by the registries
pub mod events;

/// Timestamps and clock sources
pub mod time;

pub use address::Address;
pub use context::Context;
pub use events::Event;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
