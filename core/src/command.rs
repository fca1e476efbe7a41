use serde::{Deserialize, Serialize};
use crate::types::AgentId;

/// All operator-issued commands.
/// Variants are added over time — never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ControlCommand {
    // ── Clock control ─────────────────────────────
    Start { interval_ms: Option<u64> },
    Pause,
    Reset,
    SetSpeed { interval_ms: u64 },

    // ── Population ────────────────────────────────
    AddAgent,
    AddTask,
    Abandon { agent_id: AgentId },
}
