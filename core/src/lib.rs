//! taskforce-core: agents that find, claim and finish work, one tick at a time.

pub mod agent;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod factory;
pub mod observer;
pub mod population;
pub mod rng;
pub mod seed;
pub mod simulation;
pub mod snapshot;
pub mod task;
pub mod ticker;
pub mod types;
