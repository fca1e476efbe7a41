//! Same seed data + same master seed = same run.

use taskforce_core::{
    config::SimConfig,
    event::SimEvent,
    seed::SeedData,
    simulation::Simulation,
};

fn run(master_seed: u64, ticks: u64) -> (Vec<SimEvent>, Simulation) {
    let seed = SeedData::load_dir(format!("{}/../data", env!("CARGO_MANIFEST_DIR"))).unwrap();
    let mut sim = Simulation::new("determinism".into(), seed, SimConfig::default_test(), master_seed)
        .unwrap();
    let mut events = Vec::new();
    for tick in 0..ticks {
        if tick % 10 == 0 {
            sim.add_agent().unwrap();
            sim.add_task().unwrap();
            sim.add_task().unwrap();
        }
        events.extend(sim.tick().events);
    }
    (events, sim)
}

#[test]
fn same_seed_same_run() {
    let (events_a, sim_a) = run(12345, 80);
    let (events_b, sim_b) = run(12345, 80);
    assert_eq!(events_a, events_b);
    assert_eq!(sim_a.population(), sim_b.population());
}

#[test]
fn different_seed_different_population() {
    let (_, sim_a) = run(1, 30);
    let (_, sim_b) = run(2, 30);
    assert_ne!(sim_a.population(), sim_b.population());
}

#[test]
fn seeded_population_does_not_depend_on_master_seed() {
    let (_, sim_a) = run(1, 0);
    let (_, sim_b) = run(2, 0);
    assert_eq!(sim_a.agents().len(), sim_b.agents().len());
    assert_eq!(sim_a.agents(), sim_b.agents());
}
