//! Simulation clock — owns tick count, running state and tick interval.
//!
//! The clock never sleeps. Wall-clock scheduling is the ticker's job;
//! the clock only records what the ticker should be doing.

use crate::{
    error::{SimError, SimResult},
    types::Tick,
};
use serde::{Deserialize, Serialize};

/// Interval at which the speed factor reads 1.0x.
pub const REFERENCE_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    pub interval_ms:  u64,
    pub running:      bool,
}

impl SimClock {
    pub fn new(interval_ms: u64) -> SimResult<Self> {
        validate_interval(interval_ms)?;
        Ok(Self {
            current_tick: 0,
            interval_ms,
            running: false,
        })
    }

    /// Advance one tick. Returns the new tick number.
    pub fn advance(&mut self) -> Tick {
        self.current_tick += 1;
        self.current_tick
    }

    /// Start ticking at `interval_ms`. Returns false if already running,
    /// in which case nothing changes.
    pub fn start(&mut self, interval_ms: u64) -> SimResult<bool> {
        validate_interval(interval_ms)?;
        if self.running {
            return Ok(false);
        }
        self.interval_ms = interval_ms;
        self.running = true;
        Ok(true)
    }

    /// Stop ticking. Returns false if already paused.
    pub fn pause(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Change the interval. A running clock keeps running; the ticker
    /// re-arms its deadline from the new value. Invalid values leave the
    /// clock untouched.
    pub fn set_interval(&mut self, interval_ms: u64) -> SimResult<()> {
        validate_interval(interval_ms)?;
        self.interval_ms = interval_ms;
        Ok(())
    }

    /// Back to tick 0, paused. The interval is kept.
    pub fn reset(&mut self) {
        self.current_tick = 0;
        self.running = false;
    }

    pub fn speed_factor(&self) -> f64 {
        REFERENCE_INTERVAL_MS as f64 / self.interval_ms as f64
    }
}

fn validate_interval(interval_ms: u64) -> SimResult<()> {
    if interval_ms == 0 {
        return Err(SimError::InvalidInterval { interval_ms });
    }
    Ok(())
}
