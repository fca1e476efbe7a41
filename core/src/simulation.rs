//! The simulation context — one independent, fully owned simulation.
//!
//! Owns the clock, the population, the engine, the factory and the event
//! log. Every mutation takes `&mut self`, so control commands can only
//! land between ticks, never during one.

use crate::{
    agent::Agent,
    clock::SimClock,
    command::ControlCommand,
    config::SimConfig,
    engine::AssignmentEngine,
    error::{SimError, SimResult},
    event::{EventLog, EventLogEntry, SimEvent},
    factory::{PopulationFactory, RandomFactory},
    observer::SimObserver,
    population::Population,
    seed::SeedData,
    snapshot::{SimSnapshot, TaskCounts},
    task::{Task, TaskStatus},
    types::{AgentId, RunId, TaskId, Tick},
};

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub tick:           Tick,
    pub events:         Vec<SimEvent>,
    pub counts:         TaskCounts,
    pub busy_agents:    usize,
    pub resting_agents: usize,
}

pub struct Simulation {
    pub run_id: RunId,
    seed:       SeedData,
    config:     SimConfig,
    clock:      SimClock,
    population: Population,
    engine:     AssignmentEngine,
    factory:    Box<dyn PopulationFactory>,
    log:        EventLog,
    observers:  Vec<Box<dyn SimObserver>>,
}

impl Simulation {
    /// Build a simulation whose factory draws from the seed pools with a
    /// deterministic RNG derived from `master_seed`.
    pub fn new(run_id: RunId, seed: SeedData, config: SimConfig, master_seed: u64) -> SimResult<Self> {
        let factory = RandomFactory::new(&seed, config.factory.clone(), master_seed);
        Self::with_factory(run_id, seed, config, Box::new(factory))
    }

    pub fn with_factory(
        run_id: RunId,
        seed: SeedData,
        config: SimConfig,
        factory: Box<dyn PopulationFactory>,
    ) -> SimResult<Self> {
        seed.validate()?;
        config.validate()?;
        let clock = SimClock::new(config.default_interval_ms)?;
        let population = Population::from_seed(&seed);
        log::info!(
            "run {run_id}: initialized with {} agents, {} tasks",
            population.agents.len(),
            population.tasks.len()
        );
        Ok(Self {
            run_id,
            engine: AssignmentEngine::new(config.policy.clone()),
            log: EventLog::new(config.event_log_capacity),
            seed,
            config,
            clock,
            population,
            factory,
            observers: Vec::new(),
        })
    }

    /// Test simulation: default config, fixed master seed.
    pub fn build_test(seed: SeedData) -> SimResult<Self> {
        Self::new("test-run".into(), seed, SimConfig::default_test(), 42)
    }

    /// Register an observer. It immediately receives the current snapshot.
    pub fn attach(&mut self, mut observer: Box<dyn SimObserver>) {
        observer.on_snapshot(&self.snapshot());
        self.observers.push(observer);
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn clock(&self)      -> &SimClock   { &self.clock }
    pub fn config(&self)     -> &SimConfig  { &self.config }
    pub fn population(&self) -> &Population { &self.population }
    pub fn log(&self)        -> &EventLog   { &self.log }
    pub fn agents(&self)     -> &[Agent]    { &self.population.agents }
    pub fn tasks(&self)      -> &[Task]     { &self.population.tasks }

    pub fn agent(&self, id: &str) -> Option<&Agent> { self.population.agent(id) }
    pub fn task(&self, id: &str)  -> Option<&Task>  { self.population.task(id) }

    /// Direct access for embedders and tests that need to stage a scenario.
    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    pub fn is_running(&self) -> bool { self.clock.running }
    pub fn current_tick(&self) -> Tick { self.clock.current_tick }

    // ── Clock control ─────────────────────────────────────────

    /// Start ticking. `None` keeps the current interval. No-op if running.
    pub fn start(&mut self, interval_ms: Option<u64>) -> SimResult<bool> {
        let interval_ms = interval_ms.unwrap_or(self.clock.interval_ms);
        let started = self.clock.start(interval_ms)?;
        if started {
            log::info!("run {}: started at {interval_ms}ms/tick", self.run_id);
            self.record(SimEvent::SimulationStarted { interval_ms });
            self.publish();
        }
        Ok(started)
    }

    /// Stop future ticks. State is untouched. No-op if paused.
    pub fn pause(&mut self) -> bool {
        let paused = self.clock.pause();
        if paused {
            log::info!("run {}: paused at tick {}", self.run_id, self.clock.current_tick);
            self.record(SimEvent::SimulationPaused);
            self.publish();
        }
        paused
    }

    /// Change the tick interval. Rejected values leave everything as it was.
    pub fn set_interval(&mut self, interval_ms: u64) -> SimResult<()> {
        let previous = self.clock.interval_ms;
        self.clock.set_interval(interval_ms)?;
        if previous != interval_ms {
            log::info!("run {}: interval {previous}ms -> {interval_ms}ms", self.run_id);
            self.record(SimEvent::IntervalChanged { interval_ms });
            self.publish();
        }
        Ok(())
    }

    /// Pause, drop every agent and task, and rebuild from the seed data.
    /// Id counters keep running so ids are never reused within a run.
    pub fn reset(&mut self) {
        self.clock.reset();
        self.population = Population::from_seed(&self.seed);
        self.log.clear();
        log::info!("run {}: reset to seed population", self.run_id);
        self.record(SimEvent::SimulationReset);
        self.publish();
    }

    // ── Population control ────────────────────────────────────

    pub fn add_agent(&mut self) -> SimResult<AgentId> {
        let agent = self.factory.create_agent()?;
        let id = agent.id.clone();
        let event = SimEvent::AgentAdded {
            agent_id:   agent.id.clone(),
            agent_name: agent.name.clone(),
            skills:     agent.skills.clone(),
        };
        self.population.agents.push(agent);
        self.record(event);
        self.publish();
        Ok(id)
    }

    pub fn add_task(&mut self) -> SimResult<TaskId> {
        let task = self.factory.create_task()?;
        let id = task.id.clone();
        let event = SimEvent::TaskAdded {
            task_id:   task.id.clone(),
            task_name: task.name.clone(),
            priority:  task.priority,
        };
        self.population.tasks.push(task);
        self.record(event);
        self.publish();
        Ok(id)
    }

    /// Pull an agent off its task. The task stays in progress with no
    /// assignee, which makes it eligible for rescue or resumption.
    /// Returns false if the agent was not busy.
    pub fn abandon(&mut self, agent_id: &str) -> SimResult<bool> {
        let Population { agents, tasks } = &mut self.population;
        let agent = agents
            .iter_mut()
            .find(|a| a.id == agent_id)
            .ok_or_else(|| SimError::UnknownAgent { agent_id: agent_id.to_string() })?;
        let Some(task_id) = agent.current_task_id.clone() else {
            return Ok(false);
        };

        agent.release();
        let event = match tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) if task.status == TaskStatus::InProgress => {
                task.assigned_agent_name = None;
                SimEvent::TaskAbandoned {
                    agent_id:   agent.id.clone(),
                    agent_name: agent.name.clone(),
                    task_id,
                    task_name:  task.name.clone(),
                }
            }
            _ => SimEvent::DanglingTaskCleared {
                agent_id:   agent.id.clone(),
                agent_name: agent.name.clone(),
                task_id,
            },
        };
        self.record(event);
        self.publish();
        Ok(true)
    }

    /// Apply one control-surface command.
    pub fn apply(&mut self, command: ControlCommand) -> SimResult<()> {
        match command {
            ControlCommand::Start { interval_ms }    => { self.start(interval_ms)?; }
            ControlCommand::Pause                    => { self.pause(); }
            ControlCommand::Reset                    => self.reset(),
            ControlCommand::SetSpeed { interval_ms } => self.set_interval(interval_ms)?,
            ControlCommand::AddAgent                 => { self.add_agent()?; }
            ControlCommand::AddTask                  => { self.add_task()?; }
            ControlCommand::Abandon { agent_id }     => { self.abandon(&agent_id)?; }
        }
        Ok(())
    }

    // ── Ticking ───────────────────────────────────────────────

    /// Run one engine pass. The caller decides when; the ticker only calls
    /// this while the clock is running.
    pub fn tick(&mut self) -> TickSummary {
        let tick = self.clock.advance();
        let events = self.engine.run_tick(tick, &mut self.population);
        for event in &events {
            self.record(event.clone());
        }

        let summary = TickSummary {
            tick,
            events,
            counts: self.counts(),
            busy_agents: self.population.agents.iter().filter(|a| a.is_busy()).count(),
            resting_agents: self.population.agents.iter().filter(|a| a.is_resting()).count(),
        };
        log::debug!(
            "tick={tick} summary: {} events, pending={} in_progress={} completed={} busy={} resting={}",
            summary.events.len(),
            summary.counts.pending,
            summary.counts.in_progress,
            summary.counts.completed,
            summary.busy_agents,
            summary.resting_agents
        );
        self.publish();
        summary
    }

    /// Run n ticks back to back. Used for testing and batch runs.
    pub fn run_ticks(&mut self, n: u64) -> Vec<TickSummary> {
        (0..n).map(|_| self.tick()).collect()
    }

    // ── Presentation ──────────────────────────────────────────

    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            pending:     self.population.count_tasks(TaskStatus::Pending),
            in_progress: self.population.count_tasks(TaskStatus::InProgress),
            completed:   self.population.count_tasks(TaskStatus::Completed),
        }
    }

    pub fn snapshot(&self) -> SimSnapshot {
        let (pending, in_progress, completed) = SimSnapshot::partition(&self.population.tasks);
        SimSnapshot {
            run_id:       self.run_id.clone(),
            tick:         self.clock.current_tick,
            running:      self.clock.running,
            interval_ms:  self.clock.interval_ms,
            speed_factor: self.clock.speed_factor(),
            agents:       self.population.agents.clone(),
            counts:       self.counts(),
            pending,
            in_progress,
            completed,
            log:          self.log.entries().cloned().collect(),
        }
    }

    fn record(&mut self, event: SimEvent) {
        let entry = EventLogEntry::new(self.clock.current_tick, event);
        for observer in &mut self.observers {
            observer.on_event(&entry);
        }
        self.log.push(entry);
    }

    fn publish(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer.on_snapshot(&snapshot);
        }
    }
}
