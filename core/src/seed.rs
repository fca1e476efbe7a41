//! Seed data — the initial population and the string pools the factory
//! draws from. Consumed once at startup and again on every reset.

use crate::{
    agent::Agent,
    error::{SimError, SimResult},
    task::{Priority, Task},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A skill field that may be written as `"Backend"` or `["Backend", "Data"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SkillList {
    One(String),
    Many(Vec<String>),
}

impl SkillList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(skill) => vec![skill],
            Self::Many(skills) => skills,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedAgent {
    pub id: String,
    pub name: String,
    #[serde(alias = "skills")]
    pub skill: SkillList,
    pub speed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedTask {
    pub id: String,
    pub name: String,
    pub skill_required: String,
    pub total_work: u32,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub initial_agents: Vec<SeedAgent>,
    pub initial_tasks: Vec<SeedTask>,
    pub possible_agent_names: Vec<String>,
    pub possible_skills: Vec<String>,
    pub possible_task_names: Vec<String>,
}

impl SeedData {
    /// Load `<data_dir>/seed.json`.
    pub fn load_dir(data_dir: impl AsRef<Path>) -> SimResult<Self> {
        Self::load(data_dir.as_ref().join("seed.json"))
    }

    /// Load seed data from a JSON file. Without it the simulation cannot start.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SimError::MissingSeedData {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let seed = Self::from_json(&content)?;
        log::info!(
            "loaded seed data from {}: {} agents, {} tasks",
            path.display(),
            seed.initial_agents.len(),
            seed.initial_tasks.len()
        );
        Ok(seed)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    /// Structural checks that every seeded entity must pass.
    pub fn validate(&self) -> SimResult<()> {
        if let Some(id) = first_duplicate(self.initial_agents.iter().map(|a| a.id.as_str())) {
            return Err(SimError::InvalidSeedData {
                reason: format!("agent id {id} appears more than once"),
            });
        }
        if let Some(id) = first_duplicate(self.initial_tasks.iter().map(|t| t.id.as_str())) {
            return Err(SimError::InvalidSeedData {
                reason: format!("task id {id} appears more than once"),
            });
        }
        for a in &self.initial_agents {
            if a.skill.clone().into_vec().is_empty() {
                return Err(SimError::InvalidSeedData {
                    reason: format!("agent {} has no skills", a.id),
                });
            }
            if a.speed == 0 {
                return Err(SimError::InvalidSeedData {
                    reason: format!("agent {} has zero speed", a.id),
                });
            }
        }
        for t in &self.initial_tasks {
            if t.total_work == 0 {
                return Err(SimError::InvalidSeedData {
                    reason: format!("task {} has zero total work", t.id),
                });
            }
        }
        Ok(())
    }

    pub fn build_agents(&self) -> Vec<Agent> {
        self.initial_agents
            .iter()
            .map(|a| Agent::new(a.id.clone(), a.name.clone(), a.skill.clone().into_vec(), a.speed))
            .collect()
    }

    pub fn build_tasks(&self) -> Vec<Task> {
        self.initial_tasks
            .iter()
            .map(|t| Task::new(t.id.clone(), t.name.clone(), t.skill_required.clone(), t.priority, t.total_work))
            .collect()
    }

    /// Highest numeric suffix among seeded agent ids (`A7` → 7), or 0.
    pub fn max_agent_suffix(&self) -> u64 {
        max_suffix(self.initial_agents.iter().map(|a| a.id.as_str()))
    }

    /// Highest numeric suffix among seeded task ids (`T12` → 12), or 0.
    pub fn max_task_suffix(&self) -> u64 {
        max_suffix(self.initial_tasks.iter().map(|t| t.id.as_str()))
    }
}

/// Numeric part of an id after its one-letter prefix. Non-numeric ids are ignored.
pub fn id_suffix(id: &str) -> Option<u64> {
    let mut chars = id.chars();
    chars.next()?;
    chars.as_str().parse().ok()
}

fn first_duplicate<'a>(mut ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    ids.find(|id| !seen.insert(*id))
}

fn max_suffix<'a>(ids: impl Iterator<Item = &'a str>) -> u64 {
    ids.filter_map(id_suffix).max().unwrap_or(0)
}
