use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Seed data unavailable at {path}: {reason}")]
    MissingSeedData { path: String, reason: String },

    #[error("Invalid seed data: {reason}")]
    InvalidSeedData { reason: String },

    #[error("Invalid tick interval: {interval_ms}ms (must be > 0)")]
    InvalidInterval { interval_ms: u64 },

    #[error("Cannot create entity: pool '{pool}' is empty")]
    EmptyPool { pool: &'static str },

    #[error("Agent '{agent_id}' not found")]
    UnknownAgent { agent_id: String },

    #[error("Ticker is no longer running")]
    TickerClosed,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
