//! sim-runner: headless runner for the Task Force simulation.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 60 --data ./data
//!   sim-runner --seed 12345 --interval 500 --ipc-mode

use anyhow::Result;
use std::env;
use std::io::{self, Write};
use taskforce_core::{
    command::ControlCommand,
    config::SimConfig,
    observer::LogObserver,
    seed::SeedData,
    simulation::Simulation,
    snapshot::SimSnapshot,
    ticker::{self, TickerHandle},
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(serde::Serialize)]
struct IpcOutput<'a> {
    #[serde(rename = "type")]
    kind:  &'static str,
    state: &'a SimSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 60u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    // Without seed data there is nothing to simulate: fail before starting.
    let seed_data = SeedData::load_dir(data_dir)?;
    let mut config = SimConfig::load(data_dir)?;
    config.default_interval_ms = parse_arg(&args, "--interval", config.default_interval_ms);
    config.validate()?;

    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4().simple());

    if !ipc_mode {
        println!("Task Force — sim-runner");
        println!("  run_id:    {run_id}");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let mut simulation = Simulation::new(run_id, seed_data, config, seed)?;
    simulation.attach(Box::new(LogObserver));

    if ipc_mode {
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(run_ipc_loop(simulation))?;
    } else {
        simulation.run_ticks(ticks);
        print_summary(&simulation.snapshot());
    }

    Ok(())
}

async fn run_ipc_loop(simulation: Simulation) -> Result<()> {
    let (handle, join) = ticker::spawn(simulation);
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_tick = updates.borrow().tick;

    emit("state", &handle.snapshot().await?)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break }; // EOF
                if line.trim().is_empty() {
                    continue;
                }
                match handle_line(&handle, &line).await {
                    Ok(Some(snapshot)) => {
                        last_tick = snapshot.tick;
                        emit("state", &snapshot)?;
                    }
                    Ok(None) => break,
                    Err(e) => emit_error(&e.to_string())?,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.tick != last_tick {
                    last_tick = snapshot.tick;
                    emit("tick", &snapshot)?;
                }
            }
        }
    }

    handle.shutdown().await.ok();
    let simulation = join.await?;
    log::info!("ipc loop finished at tick {}", simulation.current_tick());
    Ok(())
}

/// Returns the snapshot to report, or None to quit.
async fn handle_line(handle: &TickerHandle, line: &str) -> Result<Option<SimSnapshot>> {
    let value: serde_json::Value = serde_json::from_str(line)?;
    match value.get("cmd").and_then(|c| c.as_str()) {
        Some("quit") => return Ok(None),
        Some("get_state") => {}
        _ => {
            let command: ControlCommand = serde_json::from_value(value)?;
            handle.apply(command).await?;
        }
    }
    Ok(Some(handle.snapshot().await?))
}

fn emit(kind: &'static str, state: &SimSnapshot) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string(&IpcOutput { kind, state })?)?;
    stdout.flush()?;
    Ok(())
}

fn emit_error(message: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::json!({ "error": message }))?;
    stdout.flush()?;
    Ok(())
}

fn print_summary(snapshot: &SimSnapshot) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:       {}", snapshot.run_id);
    println!("  final tick:   {}", snapshot.tick);
    println!("  agents:       {}", snapshot.agents.len());
    println!("  pending:      {}", snapshot.counts.pending);
    println!("  in progress:  {}", snapshot.counts.in_progress);
    println!("  completed:    {}", snapshot.counts.completed);

    println!();
    println!("=== AGENTS ===");
    for agent in &snapshot.agents {
        println!(
            "  {:<4} {:<10} {:<16} speed {:>2} | done {:>2} | [{}]",
            agent.id,
            agent.name,
            agent.status_label(),
            agent.speed,
            agent.lifetime_completions,
            agent.skills.join(", ")
        );
    }

    println!();
    println!("=== RECENT EVENTS ===");
    if snapshot.log.is_empty() {
        println!("  (no events)");
    }
    for entry in snapshot.log.iter().take(10) {
        println!("  [tick {:>3}] {}: {}", entry.tick, entry.actor, entry.message);
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
