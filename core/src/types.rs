//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = every agent acts once.
pub type Tick = u64;

/// Agent identifier of the form `A<n>`.
pub type AgentId = String;

/// Task identifier of the form `T<n>`.
pub type TaskId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Actor name used for control-surface events.
pub const SYSTEM_ACTOR: &str = "System";
