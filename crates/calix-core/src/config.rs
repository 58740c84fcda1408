//! Configuration for the worker endpoint and transport.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Port the local bubble worker listens on.
pub const DEFAULT_WORKER_PORT: u16 = 9997;

/// Default connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Top-level Calix configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalixConfig {
    /// Bubble worker WebSocket port.
    pub worker_port: u16,
    /// Connect timeout for the worker transport, in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for CalixConfig {
    fn default() -> Self {
        Self {
            worker_port: DEFAULT_WORKER_PORT,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl CalixConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let worker_port = std::env::var("CALIX_WORKER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_WORKER_PORT);

        Self {
            worker_port,
            ..Self::default()
        }
    }

    /// Worker WebSocket endpoint URL.
    pub fn worker_url(&self) -> String {
        format!("ws://localhost:{}", self.worker_port)
    }

    /// Connect timeout as a duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
