//! Outbound command frames sent to the bubble worker.

use calix_core::Result;
use serde::{Deserialize, Serialize};

/// A command sent to the worker as a JSON text frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerCommand {
    /// Execute a shell command on the worker.
    CliCommand { command: String },
    /// Request worker identity and session stats.
    SystemInfo,
    /// Liveness probe; the worker answers with a pong frame.
    Ping,
}

impl WorkerCommand {
    /// Serialize to the wire frame.
    pub fn to_frame(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
