//! Command console over a worker connection.

use tracing::info;

use calix_core::{CalixConfig, Result, Transcript};
use calix_protocol::{WorkerCommand, WorkerReply};

use crate::connection::{Connection, ConnectionEvent, ConnectionState};

/// The popup command console: one connection, one timestamped transcript.
pub struct Console {
    connection: Connection,
    transcript: Transcript,
}

impl Console {
    /// Console for the configured worker endpoint.
    pub fn new(config: &CalixConfig) -> Result<Self> {
        Ok(Self {
            connection: Connection::from_config(config)?,
            transcript: Transcript::timestamped(),
        })
    }

    /// Console over an existing connection.
    pub fn with_connection(connection: Connection) -> Self {
        Self {
            connection,
            transcript: Transcript::timestamped(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn state(&self) -> ConnectionState {
        self.connection.state().await
    }

    /// Status indicator text for the current state.
    pub async fn status_text(&self) -> &'static str {
        match self.state().await {
            ConnectionState::Connected => "Connected to Cali X One",
            ConnectionState::Connecting => "Connecting...",
            ConnectionState::Disconnected => "Disconnected",
        }
    }

    /// Label for the connect button.
    pub async fn toggle_label(&self) -> &'static str {
        if self.state().await == ConnectionState::Connected {
            "Disconnect"
        } else {
            "Connect"
        }
    }

    /// Connect-button action: close when connected, connect otherwise.
    pub async fn toggle_connection(&self) {
        if self.state().await == ConnectionState::Connected {
            let _ = self.connection.disconnect().await;
            self.transcript.push("Disconnected from Bubble Worker");
            info!("disconnected from {}", self.connection.url());
            return;
        }

        match self.connection.connect().await {
            Ok(()) => {
                self.transcript.push("Connected to Bubble Worker");
                info!("connected to {}", self.connection.url());
            }
            Err(e) => {
                self.transcript.push(format!("Connection failed: {}", e));
            }
        }
    }

    /// Send a CLI command. Guard first, then trim; an empty command is
    /// a no-op. The caller clears its input immediately, no reply wait.
    pub async fn send_command(&self, input: &str) {
        if self.state().await != ConnectionState::Connected {
            self.transcript.push("Not connected to Bubble Worker");
            return;
        }

        let command = input.trim();
        if command.is_empty() {
            return;
        }

        self.transmit(WorkerCommand::CliCommand {
            command: command.to_string(),
        })
        .await;
    }

    /// Request worker identity and session stats.
    pub async fn system_info(&self) {
        if self.state().await != ConnectionState::Connected {
            self.transcript.push("Not connected to Bubble Worker");
            return;
        }
        self.transmit(WorkerCommand::SystemInfo).await;
    }

    /// Liveness probe.
    pub async fn ping(&self) {
        if self.state().await != ConnectionState::Connected {
            self.transcript.push("Not connected to Bubble Worker");
            return;
        }
        self.transmit(WorkerCommand::Ping).await;
    }

    async fn transmit(&self, command: WorkerCommand) {
        if let Err(e) = self.connection.send(&command).await {
            self.transcript.push(format!("WebSocket error: {}", e));
        }
    }

    /// Next connection event, when one arrives.
    pub async fn next_event(&self) -> Option<ConnectionEvent> {
        self.connection.recv().await
    }

    /// Render one connection event into the transcript.
    pub fn apply(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Error(e) => {
                self.transcript.push(format!("WebSocket error: {}", e));
            }
            ConnectionEvent::Closed => {
                self.transcript.push("Disconnected from Bubble Worker");
            }
            ConnectionEvent::Reply(reply) => self.render_reply(reply),
        }
    }

    fn render_reply(&self, reply: WorkerReply) {
        match reply {
            WorkerReply::CommandResult {
                command,
                stdout,
                stderr,
            } => {
                self.transcript
                    .push(format!("$ {}", command.unwrap_or_default()));
                self.transcript.push(stdout);
                if let Some(stderr) = stderr {
                    if !stderr.is_empty() {
                        self.transcript.push(format!("Error: {}", stderr));
                    }
                }
            }
            WorkerReply::Pong => {
                self.transcript.push("Pong from server");
            }
            WorkerReply::WorkerInfo {
                worker_id,
                active_sessions,
            } => {
                self.transcript.push(format!(
                    "System Info: Worker {}, {} sessions",
                    worker_id, active_sessions
                ));
            }
            WorkerReply::Other(value) => {
                let rendered =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                self.transcript.push(rendered);
            }
        }
    }
}
