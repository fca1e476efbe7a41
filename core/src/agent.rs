//! Worker agents — the actors of the simulation.
//!
//! INVARIANTS (checked by tests, maintained by the engine):
//!   - `current_task_id.is_some()` iff `status == Busy`.
//!   - `rest_cycles_remaining > 0` only while `status == Resting`.

use crate::types::{AgentId, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Free,
    Busy,
    Resting,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    pub id:                      AgentId,
    pub name:                    String,
    /// Insertion order is kept for display; matching ignores it.
    pub skills:                  Vec<String>,
    /// Work units contributed per tick.
    pub speed:                   u32,
    pub status:                  AgentStatus,
    pub current_task_id:         Option<TaskId>,
    pub rest_cycles_remaining:   u32,
    /// Completions since the last rest. Drives fatigue.
    pub consecutive_completions: u32,
    /// Completions over the whole run. Display only.
    pub lifetime_completions:    u32,
}

impl Agent {
    /// A fresh, free agent. Duplicate skills are dropped, first occurrence wins.
    pub fn new(id: AgentId, name: impl Into<String>, skills: Vec<String>, speed: u32) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(skills.len());
        for skill in skills {
            if !unique.contains(&skill) {
                unique.push(skill);
            }
        }
        Self {
            id,
            name: name.into(),
            skills: unique,
            speed,
            status: AgentStatus::Free,
            current_task_id: None,
            rest_cycles_remaining: 0,
            consecutive_completions: 0,
            lifetime_completions: 0,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn is_free(&self)    -> bool { self.status == AgentStatus::Free }
    pub fn is_busy(&self)    -> bool { self.status == AgentStatus::Busy }
    pub fn is_resting(&self) -> bool { self.status == AgentStatus::Resting }

    /// Take ownership of a task.
    pub(crate) fn assign(&mut self, task_id: TaskId) {
        self.status = AgentStatus::Busy;
        self.current_task_id = Some(task_id);
    }

    /// Drop the current task, whatever its state.
    pub(crate) fn release(&mut self) {
        self.status = AgentStatus::Free;
        self.current_task_id = None;
    }

    pub(crate) fn start_rest(&mut self, cycles: u32) {
        self.status = AgentStatus::Resting;
        self.current_task_id = None;
        self.rest_cycles_remaining = cycles;
        self.consecutive_completions = 0;
    }

    /// Human-readable status, e.g. `Busy (T3)` or `Resting (2)`.
    pub fn status_label(&self) -> String {
        match (self.status, &self.current_task_id) {
            (AgentStatus::Busy, Some(task_id)) => format!("Busy ({task_id})"),
            (AgentStatus::Resting, _) => format!("Resting ({})", self.rest_cycles_remaining),
            (status, _) => status.to_string(),
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Free    => "Free",
            Self::Busy    => "Busy",
            Self::Resting => "Resting",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_agent_is_free_with_unique_skills() {
        let agent = Agent::new(
            "A1".into(),
            "Ana",
            vec!["Backend".into(), "Data".into(), "Backend".into()],
            10,
        );
        assert!(agent.is_free());
        assert_eq!(agent.skills, vec!["Backend".to_string(), "Data".to_string()]);
        assert!(agent.current_task_id.is_none());
    }

    #[test]
    fn status_label_reflects_state() {
        let mut agent = Agent::new("A1".into(), "Ana", vec!["Backend".into()], 10);
        assert_eq!(agent.status_label(), "Free");
        agent.assign("T3".into());
        assert_eq!(agent.status_label(), "Busy (T3)");
        agent.start_rest(5);
        assert_eq!(agent.status_label(), "Resting (5)");
        assert!(agent.current_task_id.is_none());
    }
}
