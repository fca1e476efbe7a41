//! Population factory — creates agents and tasks during a run.
//!
//! Ids are monotonic per run and start after the highest suffix found in
//! the seed data, so created entities never collide with seeded ones.
//! All generation is deterministic (same master seed = same population).

use crate::{
    agent::Agent,
    config::FactoryConfig,
    error::{SimError, SimResult},
    rng::{SimRng, StreamSlot},
    seed::SeedData,
    task::{Priority, Task},
};

/// Source of new entities for `add_agent` / `add_task`.
pub trait PopulationFactory: Send {
    fn create_agent(&mut self) -> SimResult<Agent>;
    fn create_task(&mut self) -> SimResult<Task>;
}

/// Monotonic `<prefix><n>` id generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    prefix: char,
    last:   u64,
}

impl IdSequence {
    /// The first id issued will be `last + 1`.
    pub fn starting_after(prefix: char, last: u64) -> Self {
        Self { prefix, last }
    }

    pub fn next_id(&mut self) -> String {
        self.last += 1;
        format!("{}{}", self.prefix, self.last)
    }

    pub fn last(&self) -> u64 {
        self.last
    }
}

/// Draws names, skills, speeds and sizes from the seed pools.
pub struct RandomFactory {
    agent_names: Vec<String>,
    skills:      Vec<String>,
    task_names:  Vec<String>,
    config:      FactoryConfig,
    agent_ids:   IdSequence,
    task_ids:    IdSequence,
    agent_rng:   SimRng,
    task_rng:    SimRng,
}

impl RandomFactory {
    pub fn new(seed: &SeedData, config: FactoryConfig, master_seed: u64) -> Self {
        Self {
            agent_names: seed.possible_agent_names.clone(),
            skills:      seed.possible_skills.clone(),
            task_names:  seed.possible_task_names.clone(),
            config,
            agent_ids:   IdSequence::starting_after('A', seed.max_agent_suffix()),
            task_ids:    IdSequence::starting_after('T', seed.max_task_suffix()),
            agent_rng:   StreamSlot::Agent.rng(master_seed),
            task_rng:    StreamSlot::Task.rng(master_seed),
        }
    }
}

impl PopulationFactory for RandomFactory {
    fn create_agent(&mut self) -> SimResult<Agent> {
        let name = self
            .agent_rng
            .pick(&self.agent_names)
            .cloned()
            .ok_or(SimError::EmptyPool { pool: "possibleAgentNames" })?;
        if self.skills.is_empty() {
            return Err(SimError::EmptyPool { pool: "possibleSkills" });
        }

        // 1..=max draws, duplicates collapse, so at least one skill survives.
        let draws = self.agent_rng.range_inclusive(1, self.config.max_skill_draws);
        let mut skills = Vec::with_capacity(draws as usize);
        for _ in 0..draws {
            if let Some(skill) = self.agent_rng.pick(&self.skills) {
                skills.push(skill.clone());
            }
        }
        let speed = self
            .agent_rng
            .range_inclusive(self.config.min_speed, self.config.max_speed);

        let agent = Agent::new(self.agent_ids.next_id(), name, skills, speed);
        log::debug!(
            "factory[{}]: created {} {} speed={} skills={:?}",
            self.agent_rng.name, agent.id, agent.name, agent.speed, agent.skills
        );
        Ok(agent)
    }

    fn create_task(&mut self) -> SimResult<Task> {
        let name = self
            .task_rng
            .pick(&self.task_names)
            .cloned()
            .ok_or(SimError::EmptyPool { pool: "possibleTaskNames" })?;
        let skill = self
            .task_rng
            .pick(&self.skills)
            .cloned()
            .ok_or(SimError::EmptyPool { pool: "possibleSkills" })?;
        let total_work = self
            .task_rng
            .range_inclusive(self.config.min_total_work, self.config.max_total_work);
        let priority = *self
            .task_rng
            .pick(&Priority::ALL)
            .unwrap_or(&Priority::Medium);

        let task = Task::new(self.task_ids.next_id(), name, skill, priority, total_work);
        log::debug!(
            "factory[{}]: created {} '{}' {} work={} priority={}",
            self.task_rng.name, task.id, task.name, task.required_skill, task.total_work, task.priority
        );
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pools() -> SeedData {
        SeedData {
            possible_agent_names: vec!["Eva".into(), "Iker".into()],
            possible_skills: vec!["Backend".into(), "Frontend".into(), "Data".into()],
            possible_task_names: vec!["Docs".into(), "Deploy".into()],
            ..SeedData::default()
        }
    }

    #[test]
    fn ids_continue_after_seed() {
        let mut ids = IdSequence::starting_after('T', 12);
        assert_eq!(ids.next_id(), "T13");
        assert_eq!(ids.next_id(), "T14");
    }

    #[test]
    fn created_agents_are_valid() {
        let mut factory = RandomFactory::new(&pools(), FactoryConfig::default(), 12345);
        for _ in 0..100 {
            let agent = factory.create_agent().unwrap();
            assert!(!agent.skills.is_empty() && agent.skills.len() <= 3);
            assert!((5..=15).contains(&agent.speed));
        }
    }

    #[test]
    fn created_tasks_are_valid() {
        let mut factory = RandomFactory::new(&pools(), FactoryConfig::default(), 12345);
        for _ in 0..100 {
            let task = factory.create_task().unwrap();
            assert!((50..=200).contains(&task.total_work));
            assert!(task.is_pending());
        }
    }

    #[test]
    fn streams_are_named_by_slot() {
        let factory = RandomFactory::new(&pools(), FactoryConfig::default(), 3);
        assert_eq!(factory.agent_rng.name, "agent");
        assert_eq!(factory.task_rng.name, "task");
    }

    #[test]
    fn generation_is_deterministic() {
        let mut a = RandomFactory::new(&pools(), FactoryConfig::default(), 42);
        let mut b = RandomFactory::new(&pools(), FactoryConfig::default(), 42);
        assert_eq!(a.create_agent().unwrap(), b.create_agent().unwrap());
        assert_eq!(a.create_task().unwrap(), b.create_task().unwrap());
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut factory = RandomFactory::new(&SeedData::default(), FactoryConfig::default(), 1);
        assert!(matches!(factory.create_agent(), Err(SimError::EmptyPool { .. })));
        assert!(matches!(factory.create_task(), Err(SimError::EmptyPool { .. })));
    }
}
