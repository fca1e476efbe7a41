//! Observer trait — the seam between the simulation and whatever displays it.
//!
//! The simulation calls observers after it has finished mutating state, in
//! registration order. Observers never get mutable access to the population.

use crate::{event::EventLogEntry, snapshot::SimSnapshot};

pub trait SimObserver: Send {
    /// Called once per logged event, oldest first within a tick.
    fn on_event(&mut self, _entry: &EventLogEntry) {}

    /// Called after every tick and every manual mutation.
    fn on_snapshot(&mut self, _snapshot: &SimSnapshot) {}
}

/// Forwards every event to the `log` facade at info level.
pub struct LogObserver;

impl SimObserver for LogObserver {
    fn on_event(&mut self, entry: &EventLogEntry) {
        log::info!("tick={} [{}] {}", entry.tick, entry.actor, entry.message);
    }
}
