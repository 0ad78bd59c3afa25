//! Execution context
//!
//! A [`Context`] bundles the two substrate services every operation needs: a
//! clock and an append-only event sink. Operations take `&mut Context`
//! alongside the registry handles they touch; there is no ambient global
//! state to reach for.
//!
//! The in-memory sink stands in for the substrate's durable event log. A
//! failing operation appends nothing: events are emitted only after all
//! validation for the emitting step has passed, preserving the all-or-nothing
//! failure contract.

use crate::events::Event;
use crate::time::{Clock, SystemClock, Timestamp};
use std::sync::Arc;

/// Per-deployment execution context: clock plus event sink.
pub struct Context {
    clock: Arc<dyn Clock>,
    events: Vec<Event>,
}

impl Context {
    /// Create a context over the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            events: Vec::new(),
        }
    }

    /// Create a context over the operating-system clock.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// The current time as seen by this context's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Append an event to the sink.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// All events emitted so far, in order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Checkpoint the sink before a compound operation's first emission.
    pub fn mark(&self) -> usize {
        self.events.len()
    }

    /// Discard every event emitted since `mark`.
    ///
    /// Compound operations call this on abort so a failing call contributes
    /// nothing to the sink, matching the all-or-nothing failure contract.
    pub fn revert_to(&mut self, mark: usize) {
        self.events.truncate(mark);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("now", &self.now())
            .field("events", &self.events.len())
            .finish()
    }
}
