//! Units of work and the dispatch ordering shared by every pickup rule.

use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Progress value a task is pinned to once it completes.
pub const COMPLETED_PROGRESS: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn rank(&self) -> u8 {
        match self {
            Self::Low    => 1,
            Self::Medium => 2,
            Self::High   => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low    => "Low",
            Self::Medium => "Medium",
            Self::High   => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id:                  TaskId,
    pub name:                String,
    pub required_skill:      String,
    pub priority:            Priority,
    pub total_work:          u32,
    /// Raw work units until completion, then pinned to COMPLETED_PROGRESS.
    pub progress:            u32,
    pub status:              TaskStatus,
    /// Back-reference by name. `None` while InProgress means abandoned.
    pub assigned_agent_name: Option<String>,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        required_skill: impl Into<String>,
        priority: Priority,
        total_work: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            required_skill: required_skill.into(),
            priority,
            total_work,
            progress: 0,
            status: TaskStatus::Pending,
            assigned_agent_name: None,
        }
    }

    pub fn is_pending(&self)   -> bool { self.status == TaskStatus::Pending }
    pub fn is_completed(&self) -> bool { self.status == TaskStatus::Completed }

    /// InProgress with nobody advancing it.
    pub fn is_abandoned(&self) -> bool {
        self.status == TaskStatus::InProgress && self.assigned_agent_name.is_none()
    }

    /// True once `progress >= ratio * total_work`.
    pub fn is_near_completion(&self, ratio: f64) -> bool {
        f64::from(self.progress) >= f64::from(self.total_work) * ratio
    }

    /// Display percentage in 0..=100.
    pub fn percent_complete(&self) -> u32 {
        if self.is_completed() || self.total_work == 0 {
            return COMPLETED_PROGRESS;
        }
        let pct = u64::from(self.progress) * 100 / u64::from(self.total_work);
        pct.min(100) as u32
    }

    pub(crate) fn claim(&mut self, agent_name: &str) {
        if self.status == TaskStatus::Pending {
            self.status = TaskStatus::InProgress;
        }
        self.assigned_agent_name = Some(agent_name.to_string());
    }

    /// Add work units. Returns true if this finished the task.
    pub(crate) fn advance(&mut self, units: u32) -> bool {
        self.progress = self.progress.saturating_add(units);
        if self.progress >= self.total_work {
            self.progress = COMPLETED_PROGRESS;
            self.status = TaskStatus::Completed;
            return true;
        }
        false
    }
}

/// Dispatch ordering for pending work: higher priority first, then smaller
/// `total_work` first. Use with a stable sort or `min_by` so equal keys keep
/// collection order.
pub fn dispatch_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| a.total_work.cmp(&b.total_work))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, priority: Priority, work: u32) -> Task {
        Task::new(id.into(), id, "Backend", priority, work)
    }

    #[test]
    fn priority_dominates_size() {
        let low_small = task("T1", Priority::Low, 50);
        let high_big = task("T2", Priority::High, 200);
        assert_eq!(dispatch_order(&high_big, &low_small), Ordering::Less);
    }

    #[test]
    fn equal_priority_prefers_less_work() {
        let a = task("T1", Priority::Medium, 120);
        let b = task("T2", Priority::Medium, 80);
        let mut tasks = vec![a, b];
        tasks.sort_by(dispatch_order);
        assert_eq!(tasks[0].id, "T2");
    }

    #[test]
    fn full_ties_keep_collection_order() {
        let first = task("T1", Priority::High, 100);
        let second = task("T2", Priority::High, 100);
        let best = [&first, &second]
            .into_iter()
            .min_by(|a, b| dispatch_order(a, b))
            .map(|t| t.id.clone());
        assert_eq!(best.as_deref(), Some("T1"));
    }

    #[test]
    fn completion_pins_progress() {
        let mut t = task("T1", Priority::High, 25);
        assert!(!t.advance(10));
        assert_eq!(t.percent_complete(), 40);
        assert!(!t.advance(10));
        assert!(t.advance(10));
        assert_eq!(t.progress, COMPLETED_PROGRESS);
        assert!(t.is_completed());
    }

    #[test]
    fn near_completion_threshold_is_inclusive() {
        let mut t = task("T1", Priority::Low, 100);
        t.progress = 74;
        assert!(!t.is_near_completion(0.75));
        t.progress = 75;
        assert!(t.is_near_completion(0.75));
    }
}
