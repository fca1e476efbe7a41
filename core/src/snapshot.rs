//! Presentation snapshot — everything a display needs after a tick.
//!
//! A snapshot is produced after every tick and every manual mutation.
//! Tasks are partitioned by status so a board view can render columns
//! without re-filtering.

use crate::{
    agent::Agent,
    event::EventLogEntry,
    task::{Task, TaskStatus},
    types::{RunId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskCounts {
    pub pending:     usize,
    pub in_progress: usize,
    pub completed:   usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimSnapshot {
    pub run_id:       RunId,
    pub tick:         Tick,
    pub running:      bool,
    pub interval_ms:  u64,
    pub speed_factor: f64,
    pub agents:       Vec<Agent>,
    pub pending:      Vec<Task>,
    pub in_progress:  Vec<Task>,
    pub completed:    Vec<Task>,
    pub counts:       TaskCounts,
    /// Newest first.
    pub log:          Vec<EventLogEntry>,
}

impl SimSnapshot {
    /// Split tasks into status columns, preserving collection order.
    pub fn partition(tasks: &[Task]) -> (Vec<Task>, Vec<Task>, Vec<Task>) {
        let mut pending = Vec::new();
        let mut in_progress = Vec::new();
        let mut completed = Vec::new();
        for task in tasks {
            match task.status {
                TaskStatus::Pending    => pending.push(task.clone()),
                TaskStatus::InProgress => in_progress.push(task.clone()),
                TaskStatus::Completed  => completed.push(task.clone()),
            }
        }
        (pending, in_progress, completed)
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.counts.pending + self.counts.in_progress + self.counts.completed
    }
}
