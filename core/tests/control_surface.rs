//! Control surface: clock commands, reset, manual creation, observers, log.

use std::sync::{Arc, Mutex};
use taskforce_core::{
    command::ControlCommand,
    config::SimConfig,
    error::SimError,
    event::{EventLogEntry, SimEvent},
    observer::SimObserver,
    seed::SeedData,
    simulation::Simulation,
    snapshot::SimSnapshot,
};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

fn sample_sim() -> Simulation {
    let seed = SeedData::load_dir(data_dir()).unwrap();
    Simulation::new("control-test".into(), seed, SimConfig::default_test(), 42).unwrap()
}

#[test]
fn sample_seed_data_loads() {
    let seed = SeedData::load_dir(data_dir()).unwrap();
    assert_eq!(seed.initial_agents.len(), 4);
    assert_eq!(seed.max_agent_suffix(), 4);
    assert_eq!(seed.max_task_suffix(), 8);
    assert_eq!(SimConfig::load(data_dir()).unwrap(), SimConfig::default());
}

#[test]
fn missing_seed_data_is_fatal() {
    let err = SeedData::load_dir("/nonexistent/data").unwrap_err();
    assert!(matches!(err, SimError::MissingSeedData { .. }));
    // Config falls back to defaults when its file is absent.
    assert_eq!(SimConfig::load("/nonexistent/data").unwrap(), SimConfig::default());
}

#[test]
fn start_and_pause_are_idempotent() {
    let mut sim = sample_sim();
    assert!(sim.start(Some(500)).unwrap());
    assert!(!sim.start(Some(100)).unwrap());
    assert_eq!(sim.clock().interval_ms, 500);
    assert!(sim.is_running());

    let logged = sim.log().len();
    assert!(sim.pause());
    assert!(!sim.pause());
    assert_eq!(sim.log().len(), logged + 1);
    assert_eq!(sim.log().latest().unwrap().message, "Simulation paused.");
}

#[test]
fn pause_does_not_touch_population() {
    let mut sim = sample_sim();
    sim.start(None).unwrap();
    sim.run_ticks(3);
    let before = sim.population().clone();
    sim.pause();
    assert_eq!(sim.population(), &before);
}

#[test]
fn invalid_interval_is_rejected_and_state_preserved() {
    let mut sim = sample_sim();
    sim.start(Some(750)).unwrap();
    let err = sim.apply(ControlCommand::SetSpeed { interval_ms: 0 }).unwrap_err();
    assert!(matches!(err, SimError::InvalidInterval { interval_ms: 0 }));
    assert_eq!(sim.clock().interval_ms, 750);
    assert!(sim.is_running());

    sim.set_interval(250).unwrap();
    assert_eq!(sim.clock().interval_ms, 250);
    assert!(sim.is_running());
    assert!((sim.snapshot().speed_factor - 8.0).abs() < f64::EPSILON);
}

#[test]
fn reset_restores_seed_population_and_keeps_ids_fresh() {
    let mut sim = sample_sim();
    sim.start(None).unwrap();
    let added = sim.add_agent().unwrap();
    assert_eq!(added, "A5");
    sim.add_task().unwrap();
    sim.run_ticks(10);

    sim.reset();
    assert!(!sim.is_running());
    assert_eq!(sim.current_tick(), 0);
    assert_eq!(sim.agents().len(), 4);
    assert_eq!(sim.tasks().len(), 8);
    assert!(sim.agents().iter().all(|a| a.is_free()));
    assert!(sim.tasks().iter().all(|t| t.is_pending() && t.progress == 0));
    assert_eq!(sim.log().len(), 1);
    assert!(matches!(sim.log().latest().unwrap().event, SimEvent::SimulationReset));

    // Ids keep counting past anything issued before the reset.
    assert_eq!(sim.add_agent().unwrap(), "A6");
    assert_eq!(sim.add_task().unwrap(), "T10");
}

#[test]
fn created_entities_never_collide_with_seeded_ones() {
    let mut sim = sample_sim();
    for _ in 0..5 {
        sim.add_agent().unwrap();
        sim.add_task().unwrap();
    }
    let mut agent_ids: Vec<_> = sim.agents().iter().map(|a| a.id.clone()).collect();
    let mut task_ids: Vec<_> = sim.tasks().iter().map(|t| t.id.clone()).collect();
    agent_ids.sort();
    agent_ids.dedup();
    task_ids.sort();
    task_ids.dedup();
    assert_eq!(agent_ids.len(), 9);
    assert_eq!(task_ids.len(), 13);
}

#[test]
fn add_commands_log_system_events() {
    let mut sim = sample_sim();
    sim.apply(ControlCommand::AddTask).unwrap();
    let entry = sim.log().latest().unwrap();
    assert_eq!(entry.actor, "System");
    assert!(entry.message.starts_with("New task added:"));

    sim.apply(ControlCommand::AddAgent).unwrap();
    let entry = sim.log().latest().unwrap();
    assert!(entry.message.starts_with("Agent added:"));
}

#[test]
fn abandon_rejects_unknown_agents_and_ignores_idle_ones() {
    let mut sim = sample_sim();
    assert!(matches!(sim.abandon("A404"), Err(SimError::UnknownAgent { .. })));
    assert!(!sim.abandon("A1").unwrap());
}

#[test]
fn event_log_keeps_fifty_newest_first() {
    let mut sim = sample_sim();
    for _ in 0..60 {
        sim.add_task().unwrap();
    }
    let entries: Vec<&EventLogEntry> = sim.log().entries().collect();
    assert_eq!(entries.len(), 50);
    assert!(entries[0].message.contains("New task added"));
    let newest = sim.tasks().last().unwrap();
    assert!(matches!(&entries[0].event, SimEvent::TaskAdded { task_id, .. } if task_id == &newest.id));
}

#[derive(Default)]
struct Recorded {
    events:    Vec<String>,
    snapshots: Vec<SimSnapshot>,
}

struct Recorder(Arc<Mutex<Recorded>>);

impl SimObserver for Recorder {
    fn on_event(&mut self, entry: &EventLogEntry) {
        self.0.lock().unwrap().events.push(entry.message.clone());
    }

    fn on_snapshot(&mut self, snapshot: &SimSnapshot) {
        self.0.lock().unwrap().snapshots.push(snapshot.clone());
    }
}

#[test]
fn observers_see_every_tick_and_mutation() {
    let mut sim = sample_sim();
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    sim.attach(Box::new(Recorder(recorded.clone())));

    sim.start(None).unwrap();
    sim.tick();
    sim.add_task().unwrap();

    let recorded = recorded.lock().unwrap();
    // attach + start + tick + add_task
    assert_eq!(recorded.snapshots.len(), 4);
    assert_eq!(recorded.snapshots[2].tick, 1);
    assert!(recorded.events.iter().any(|m| m.starts_with("Simulation started")));

    let last = recorded.snapshots.last().unwrap();
    assert_eq!(last.task_count(), 9);
    assert_eq!(
        last.counts.pending,
        last.pending.len()
    );
    assert_eq!(last.in_progress.len() + last.completed.len() + last.pending.len(), 9);
}

#[test]
fn snapshot_partitions_tasks_by_status() {
    let mut sim = sample_sim();
    sim.run_ticks(5);
    let snapshot = sim.snapshot();
    assert!(snapshot.pending.iter().all(|t| t.is_pending()));
    assert!(snapshot.completed.iter().all(|t| t.is_completed()));
    assert!(snapshot.in_progress.iter().all(|t| !t.is_pending() && !t.is_completed()));
    assert_eq!(snapshot.counts, sim.counts());
    assert_eq!(snapshot.tick, 5);

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: SimSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.agents, snapshot.agents);
}

#[test]
fn seed_with_duplicate_task_ids_is_refused() {
    let mut seed = SeedData::load_dir(data_dir()).unwrap();
    let copy = seed.initial_tasks[0].clone();
    seed.initial_tasks.push(copy);
    let result = Simulation::new("dup-test".into(), seed, SimConfig::default_test(), 42);
    assert!(matches!(result, Err(SimError::InvalidSeedData { .. })));
}

#[test]
fn config_without_rest_cycles_is_refused() {
    let seed = SeedData::load_dir(data_dir()).unwrap();
    let mut config = SimConfig::default_test();
    config.policy.rest_cycles = 0;
    config.policy.fatigue_threshold = 1;
    let result = Simulation::new("rest-test".into(), seed, config, 42);
    assert!(result.is_err());
}
