//! Simulation events and the capped, most-recent-first event log.
//!
//! RULE: Every state change the engine or the control surface makes is
//! reported as a SimEvent. Rendering to `(actor, message)` happens here
//! and nowhere else.

use crate::{
    task::Priority,
    types::{AgentId, TaskId, Tick, SYSTEM_ACTOR},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Every event emitted during simulation.
/// Variants are added over time — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    AgentRested {
        agent_id:   AgentId,
        agent_name: String,
    },
    TaskRescued {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    LargeTaskClaimed {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    AbandonedTaskResumed {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    TaskMatched {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    FullstackTaskClaimed {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    TaskCompleted {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
    AgentFatigued {
        agent_id:    AgentId,
        agent_name:  String,
        rest_cycles: u32,
    },
    DanglingTaskCleared {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
    },

    // ── Control events ─────────────────────────────
    SimulationStarted {
        interval_ms: u64,
    },
    SimulationPaused,
    IntervalChanged {
        interval_ms: u64,
    },
    SimulationReset,
    AgentAdded {
        agent_id:   AgentId,
        agent_name: String,
        skills:     Vec<String>,
    },
    TaskAdded {
        task_id:   TaskId,
        task_name: String,
        priority:  Priority,
    },
    TaskAbandoned {
        agent_id:   AgentId,
        agent_name: String,
        task_id:    TaskId,
        task_name:  String,
    },
}

impl SimEvent {
    /// Stable string name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AgentRested { .. }          => "agent_rested",
            Self::TaskRescued { .. }          => "task_rescued",
            Self::LargeTaskClaimed { .. }     => "large_task_claimed",
            Self::AbandonedTaskResumed { .. } => "abandoned_task_resumed",
            Self::TaskMatched { .. }          => "task_matched",
            Self::FullstackTaskClaimed { .. } => "fullstack_task_claimed",
            Self::TaskCompleted { .. }        => "task_completed",
            Self::AgentFatigued { .. }        => "agent_fatigued",
            Self::DanglingTaskCleared { .. }  => "dangling_task_cleared",
            Self::SimulationStarted { .. }    => "simulation_started",
            Self::SimulationPaused            => "simulation_paused",
            Self::IntervalChanged { .. }      => "interval_changed",
            Self::SimulationReset             => "simulation_reset",
            Self::AgentAdded { .. }           => "agent_added",
            Self::TaskAdded { .. }            => "task_added",
            Self::TaskAbandoned { .. }        => "task_abandoned",
        }
    }

    /// Who the event is about: the agent's name, or `System`.
    pub fn actor(&self) -> &str {
        match self {
            Self::AgentRested { agent_name, .. }
            | Self::TaskRescued { agent_name, .. }
            | Self::LargeTaskClaimed { agent_name, .. }
            | Self::AbandonedTaskResumed { agent_name, .. }
            | Self::TaskMatched { agent_name, .. }
            | Self::FullstackTaskClaimed { agent_name, .. }
            | Self::TaskCompleted { agent_name, .. }
            | Self::AgentFatigued { agent_name, .. }
            | Self::DanglingTaskCleared { agent_name, .. }
            | Self::TaskAbandoned { agent_name, .. } => agent_name,
            _ => SYSTEM_ACTOR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::AgentRested { .. } => "has finished resting.".into(),
            Self::TaskRescued { task_name, .. } => {
                format!("is helping with a nearly finished task: {task_name}")
            }
            Self::LargeTaskClaimed { task_name, .. } => {
                format!("has taken on a large task: {task_name}")
            }
            Self::AbandonedTaskResumed { task_name, .. } => {
                format!("has resumed an abandoned task: {task_name}")
            }
            Self::TaskMatched { task_name, .. } => {
                format!("has taken a task matching their skills: {task_name}")
            }
            Self::FullstackTaskClaimed { task_name, .. } => {
                format!("has taken a task as a flexible Fullstack: {task_name}")
            }
            Self::TaskCompleted { task_name, .. } => format!("has COMPLETED the task: {task_name}"),
            Self::AgentFatigued { rest_cycles, .. } => {
                format!("is resting due to fatigue ({rest_cycles} cycles).")
            }
            Self::DanglingTaskCleared { task_id, .. } => {
                format!("lost track of task {task_id} and is free again.")
            }
            Self::SimulationStarted { interval_ms } => {
                format!("Simulation started ({interval_ms} ms per tick).")
            }
            Self::SimulationPaused => "Simulation paused.".into(),
            Self::IntervalChanged { interval_ms } => format!("Tick interval set to {interval_ms} ms."),
            Self::SimulationReset => "Simulation reset.".into(),
            Self::AgentAdded { agent_name, skills, .. } => {
                format!("Agent added: {agent_name} ({})", skills.join(", "))
            }
            Self::TaskAdded { task_name, priority, .. } => {
                format!("New task added: {task_name} ({priority})")
            }
            Self::TaskAbandoned { task_name, .. } => format!("has abandoned the task: {task_name}"),
        }
    }
}

/// A rendered event as shown to the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    pub tick:      Tick,
    pub logged_at: DateTime<Utc>,
    pub actor:     String,
    pub message:   String,
    pub event:     SimEvent,
}

impl EventLogEntry {
    pub fn new(tick: Tick, event: SimEvent) -> Self {
        Self {
            tick,
            logged_at: Utc::now(),
            actor: event.actor().to_string(),
            message: event.message(),
            event,
        }
    }
}

/// Bounded log, newest entry first. Oldest entries drop off the back.
#[derive(Debug, Clone)]
pub struct EventLog {
    capacity: usize,
    entries:  VecDeque<EventLogEntry>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn push(&mut self, entry: EventLogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &EventLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&EventLogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
