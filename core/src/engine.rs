//! The assignment & execution engine — the per-tick agent policy.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   Agents are processed once per tick in collection order. For each agent
//!   the first matching branch wins:
//!     1. Resting  — count down the rest; free the agent at zero.
//!     2. Free     — acquire a task through the pickup waterfall, then
//!                   put in the first tick of work on it.
//!     3. Busy     — advance the current task; complete it; maybe fatigue.
//!
//! PICKUP WATERFALL (first non-empty candidate set wins):
//!     a. Rescue     — abandoned, skill match, progress >= rescue_ratio.
//!     b. Large      — pending, skill match, total_work > large threshold.
//!     c. Resume     — abandoned, skill match, any progress.
//!     d. Match      — pending, skill match, best by dispatch_order.
//!     e. Fullstack  — generalists only: any pending, best by dispatch_order.
//!   a–c take the first candidate in collection order.
//!
//! RULES:
//!   - A claim made by an earlier agent is visible to later agents in the
//!     same pass, so no task is ever claimed twice.
//!   - Task references are resolved by id every tick; a missing target
//!     frees the agent instead of failing the tick.
//!   - No randomness. Same population in = same population and events out.

use crate::{
    agent::{Agent, AgentStatus},
    config::PolicyConfig,
    event::SimEvent,
    population::Population,
    task::{dispatch_order, Task},
    types::Tick,
};

/// Which waterfall branch produced a pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pickup {
    Rescue,
    Large,
    Resume,
    Match,
    Fullstack,
}

impl Pickup {
    fn event(self, agent: &Agent, task: &Task) -> SimEvent {
        let agent_id = agent.id.clone();
        let agent_name = agent.name.clone();
        let task_id = task.id.clone();
        let task_name = task.name.clone();
        match self {
            Self::Rescue    => SimEvent::TaskRescued { agent_id, agent_name, task_id, task_name },
            Self::Large     => SimEvent::LargeTaskClaimed { agent_id, agent_name, task_id, task_name },
            Self::Resume    => SimEvent::AbandonedTaskResumed { agent_id, agent_name, task_id, task_name },
            Self::Match     => SimEvent::TaskMatched { agent_id, agent_name, task_id, task_name },
            Self::Fullstack => SimEvent::FullstackTaskClaimed { agent_id, agent_name, task_id, task_name },
        }
    }
}

pub struct AssignmentEngine {
    policy: PolicyConfig,
}

impl AssignmentEngine {
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Run one full pass over every agent. Returns the events in the order
    /// they happened.
    pub fn run_tick(&self, tick: Tick, population: &mut Population) -> Vec<SimEvent> {
        let Population { agents, tasks } = population;
        let mut events = Vec::new();

        for agent in agents.iter_mut() {
            match agent.status {
                AgentStatus::Resting => self.rest(tick, agent, &mut events),
                AgentStatus::Free => {
                    // Pickup and the first unit of work share one tick.
                    if self.acquire(tick, agent, tasks, &mut events) {
                        self.work(tick, agent, tasks, &mut events);
                    }
                }
                AgentStatus::Busy => self.work(tick, agent, tasks, &mut events),
            }
        }

        events
    }

    /// Pick the task a free agent should take next, without mutating anything.
    pub fn select_task(&self, agent: &Agent, tasks: &[Task]) -> Option<(usize, Pickup)> {
        let skilled = |t: &Task| agent.has_skill(&t.required_skill);

        if let Some(i) = tasks.iter().position(|t| {
            t.is_abandoned() && t.is_near_completion(self.policy.rescue_ratio) && skilled(t)
        }) {
            return Some((i, Pickup::Rescue));
        }

        if let Some(i) = tasks.iter().position(|t| {
            t.is_pending() && t.total_work > self.policy.large_task_threshold && skilled(t)
        }) {
            return Some((i, Pickup::Large));
        }

        if let Some(i) = tasks.iter().position(|t| t.is_abandoned() && skilled(t)) {
            return Some((i, Pickup::Resume));
        }

        if let Some(i) = best_pending(tasks, skilled) {
            return Some((i, Pickup::Match));
        }

        if agent.has_skill(&self.policy.generalist_skill) {
            return best_pending(tasks, |_| true).map(|i| (i, Pickup::Fullstack));
        }

        None
    }

    fn rest(&self, tick: Tick, agent: &mut Agent, events: &mut Vec<SimEvent>) {
        agent.rest_cycles_remaining = agent.rest_cycles_remaining.saturating_sub(1);
        if agent.rest_cycles_remaining == 0 {
            agent.status = AgentStatus::Free;
            log::debug!("tick={tick} engine: {} finished resting", agent.id);
            events.push(SimEvent::AgentRested {
                agent_id:   agent.id.clone(),
                agent_name: agent.name.clone(),
            });
        }
    }

    /// Returns true if the agent is now busy.
    fn acquire(
        &self,
        tick: Tick,
        agent: &mut Agent,
        tasks: &mut [Task],
        events: &mut Vec<SimEvent>,
    ) -> bool {
        let Some((index, pickup)) = self.select_task(agent, tasks) else {
            return false;
        };
        let task = &mut tasks[index];
        task.claim(&agent.name);
        agent.assign(task.id.clone());

        log::debug!(
            "tick={tick} engine: {} took {} via {pickup:?} ({}/{})",
            agent.id, task.id, task.progress, task.total_work
        );
        events.push(pickup.event(agent, task));
        true
    }

    fn work(&self, tick: Tick, agent: &mut Agent, tasks: &mut [Task], events: &mut Vec<SimEvent>) {
        let Some(task_id) = agent.current_task_id.clone() else {
            // Busy without a task breaks the status invariant; repair it.
            agent.release();
            return;
        };

        let owned = tasks.iter_mut().find(|t| {
            t.id == task_id
                && !t.is_completed()
                && t.assigned_agent_name.as_deref() == Some(agent.name.as_str())
        });
        let Some(task) = owned else {
            log::warn!("tick={tick} engine: {} holds unknown task {task_id}, freeing", agent.id);
            agent.release();
            events.push(SimEvent::DanglingTaskCleared {
                agent_id:   agent.id.clone(),
                agent_name: agent.name.clone(),
                task_id,
            });
            return;
        };

        if !task.advance(agent.speed) {
            return;
        }

        agent.release();
        agent.consecutive_completions += 1;
        agent.lifetime_completions += 1;
        log::debug!("tick={tick} engine: {} completed {}", agent.id, task.id);
        events.push(SimEvent::TaskCompleted {
            agent_id:   agent.id.clone(),
            agent_name: agent.name.clone(),
            task_id:    task.id.clone(),
            task_name:  task.name.clone(),
        });

        if agent.consecutive_completions >= self.policy.fatigue_threshold {
            agent.start_rest(self.policy.rest_cycles);
            log::debug!("tick={tick} engine: {} fatigued, resting {} ticks", agent.id, self.policy.rest_cycles);
            events.push(SimEvent::AgentFatigued {
                agent_id:    agent.id.clone(),
                agent_name:  agent.name.clone(),
                rest_cycles: self.policy.rest_cycles,
            });
        }
    }
}

/// Index of the best pending task passing `filter`, by dispatch_order.
/// Ties keep collection order.
fn best_pending(tasks: &[Task], filter: impl Fn(&Task) -> bool) -> Option<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_pending() && filter(t))
        .min_by(|(_, a), (_, b)| dispatch_order(a, b))
        .map(|(i, _)| i)
}
