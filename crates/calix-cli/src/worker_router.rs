//! Router implementation backed directly by the worker connection.
//!
//! Stands in for the extension background relay: a `CALI_QUERY` is
//! forwarded to the worker as a CLI command and the first command
//! result is mapped back onto the router response shape.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use calix_bubble::QueryRouter;
use calix_console::{Connection, ConnectionEvent, ConnectionState};
use calix_core::{CalixConfig, Error, Result};
use calix_protocol::{RouterRequest, RouterResponse, WorkerCommand, WorkerReply};

pub struct WorkerRouter {
    connection: Connection,
}

impl WorkerRouter {
    pub fn new(config: &CalixConfig) -> Result<Self> {
        Ok(Self {
            connection: Connection::from_config(config)?,
        })
    }
}

#[async_trait]
impl QueryRouter for WorkerRouter {
    async fn route(&self, request: RouterRequest) -> Result<RouterResponse> {
        let RouterRequest::Query { query } = request;
        debug!("routing query through worker connection: {}", query);

        if self.connection.state().await != ConnectionState::Connected {
            self.connection.connect().await?;
        }

        self.connection
            .send(&WorkerCommand::CliCommand { command: query })
            .await?;

        while let Some(event) = self.connection.recv().await {
            match event {
                ConnectionEvent::Reply(WorkerReply::CommandResult {
                    command,
                    stdout,
                    stderr,
                }) => {
                    if let Some(stderr) = stderr.filter(|s| !s.is_empty()) {
                        return Ok(RouterResponse::err(stderr));
                    }
                    return Ok(RouterResponse::ok(json!({
                        "command": command,
                        "stdout": stdout,
                    })));
                }
                // Unrelated frames (pong, info broadcasts) pass through.
                ConnectionEvent::Reply(_) => {}
                ConnectionEvent::Error(e) => return Err(Error::WebSocket(e)),
                ConnectionEvent::Closed => return Err(Error::NotConnected),
            }
        }

        Err(Error::Internal("worker event stream ended".to_string()))
    }
}
