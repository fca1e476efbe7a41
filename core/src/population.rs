//! The agent and task collections a simulation owns.
//!
//! Collection order is the processing order for the engine and the
//! tie-break order for every pickup rule, so entities are only ever
//! appended, never reordered or removed individually.

use crate::{
    agent::Agent,
    seed::SeedData,
    task::{Task, TaskStatus},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Population {
    pub agents: Vec<Agent>,
    pub tasks:  Vec<Task>,
}

impl Population {
    pub fn from_seed(seed: &SeedData) -> Self {
        Self {
            agents: seed.build_agents(),
            tasks:  seed.build_tasks(),
        }
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn count_tasks(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }
}
