//! Real-time ticker — drives a Simulation on a wall-clock interval.
//!
//! One tokio task owns the Simulation outright. Control requests arrive
//! over an mpsc channel and are handled between ticks; the latest snapshot
//! is published on a watch channel. There is exactly one worker, so ticks
//! never overlap and a command can never observe a half-finished tick.
//!
//! Interval changes re-arm the next deadline from "now" (pause, then
//! restart), so no tick is doubled and none is skipped.

use crate::{
    command::ControlCommand,
    error::{SimError, SimResult},
    simulation::Simulation,
    snapshot::SimSnapshot,
};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{Duration, Instant},
};

const REQUEST_QUEUE_DEPTH: usize = 32;

enum TickerRequest {
    Command {
        command: ControlCommand,
        reply:   oneshot::Sender<SimResult<()>>,
    },
    Snapshot {
        reply: oneshot::Sender<SimSnapshot>,
    },
    Shutdown,
}

/// Cloneable control handle for a running ticker.
#[derive(Clone)]
pub struct TickerHandle {
    requests:  mpsc::Sender<TickerRequest>,
    snapshots: watch::Receiver<SimSnapshot>,
}

/// Move `simulation` into a new ticker task.
///
/// The task ends when `shutdown` is called or every handle is dropped,
/// and hands the simulation back (paused) through the join handle.
pub fn spawn(simulation: Simulation) -> (TickerHandle, JoinHandle<Simulation>) {
    let (requests, inbox) = mpsc::channel(REQUEST_QUEUE_DEPTH);
    let (publisher, snapshots) = watch::channel(simulation.snapshot());
    let join = tokio::spawn(run(simulation, inbox, publisher));
    (TickerHandle { requests, snapshots }, join)
}

impl TickerHandle {
    /// Apply a command between ticks and wait for its outcome.
    pub async fn apply(&self, command: ControlCommand) -> SimResult<()> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(TickerRequest::Command { command, reply })
            .await
            .map_err(|_| SimError::TickerClosed)?;
        outcome.await.map_err(|_| SimError::TickerClosed)?
    }

    pub async fn start(&self, interval_ms: Option<u64>) -> SimResult<()> {
        self.apply(ControlCommand::Start { interval_ms }).await
    }

    pub async fn pause(&self) -> SimResult<()> {
        self.apply(ControlCommand::Pause).await
    }

    pub async fn set_speed(&self, interval_ms: u64) -> SimResult<()> {
        self.apply(ControlCommand::SetSpeed { interval_ms }).await
    }

    pub async fn reset(&self) -> SimResult<()> {
        self.apply(ControlCommand::Reset).await
    }

    /// Current state, taken between ticks.
    pub async fn snapshot(&self) -> SimResult<SimSnapshot> {
        let (reply, outcome) = oneshot::channel();
        self.requests
            .send(TickerRequest::Snapshot { reply })
            .await
            .map_err(|_| SimError::TickerClosed)?;
        outcome.await.map_err(|_| SimError::TickerClosed)
    }

    /// Receiver that sees a fresh snapshot after every tick and command.
    pub fn subscribe(&self) -> watch::Receiver<SimSnapshot> {
        self.snapshots.clone()
    }

    pub async fn shutdown(&self) -> SimResult<()> {
        self.requests
            .send(TickerRequest::Shutdown)
            .await
            .map_err(|_| SimError::TickerClosed)
    }
}

fn next_deadline(simulation: &Simulation) -> Option<Instant> {
    simulation
        .is_running()
        .then(|| Instant::now() + Duration::from_millis(simulation.clock().interval_ms))
}

async fn run(
    mut simulation: Simulation,
    mut inbox: mpsc::Receiver<TickerRequest>,
    publisher: watch::Sender<SimSnapshot>,
) -> Simulation {
    let mut deadline = next_deadline(&simulation);
    log::debug!("ticker: started for run {}", simulation.run_id);

    loop {
        let armed = deadline;
        let wake = async move {
            match armed {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            request = inbox.recv() => {
                let Some(request) = request else { break };
                match request {
                    TickerRequest::Command { command, reply } => {
                        let before = (simulation.is_running(), simulation.clock().interval_ms);
                        let outcome = simulation.apply(command);
                        let after = (simulation.is_running(), simulation.clock().interval_ms);
                        if before != after {
                            deadline = next_deadline(&simulation);
                        }
                        if let Err(e) = &outcome {
                            log::warn!("ticker: command rejected: {e}");
                        }
                        let _ = reply.send(outcome);
                        publisher.send_replace(simulation.snapshot());
                    }
                    TickerRequest::Snapshot { reply } => {
                        let _ = reply.send(simulation.snapshot());
                    }
                    TickerRequest::Shutdown => break,
                }
            }
            _ = wake => {
                simulation.tick();
                deadline = next_deadline(&simulation);
                publisher.send_replace(simulation.snapshot());
            }
        }
    }

    simulation.pause();
    log::debug!("ticker: stopped at tick {}", simulation.current_tick());
    simulation
}
