//! Worker WebSocket connection with an explicit lifecycle state.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use calix_core::{CalixConfig, Error, Result};
use calix_protocol::{classify_reply, WorkerCommand, WorkerReply};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Event surfaced to the console.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    /// A classified reply frame from the worker.
    Reply(WorkerReply),
    /// An asynchronous transport error. Does not itself change state;
    /// the `Closed` event that follows does.
    Error(String),
    /// The transport ended (remote close or read error).
    Closed,
}

/// One WebSocket connection to the bubble worker.
///
/// At most one live socket per instance. The lifecycle is an explicit
/// state enum shared with the read task, never a nullable-handle check.
/// No reconnect logic; a failed or closed connection stays down until
/// the user connects again.
#[derive(Debug)]
pub struct Connection {
    url: Url,
    connect_timeout: Duration,
    state: Arc<RwLock<ConnectionState>>,
    writer: Arc<Mutex<Option<WsWriter>>>,
    incoming_tx: mpsc::UnboundedSender<ConnectionEvent>,
    incoming_rx: Arc<Mutex<mpsc::UnboundedReceiver<ConnectionEvent>>>,
    recv_task: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl Connection {
    /// Connection to the given `ws://` endpoint.
    pub fn new(url: &str, connect_timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::Config(e.to_string()))?;
        if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
            return Err(Error::Config(format!(
                "worker URL must use ws:// or wss:// scheme, got: {}",
                parsed.scheme()
            )));
        }

        let (incoming_tx, incoming_rx) = mpsc::unbounded_channel();

        Ok(Self {
            url: parsed,
            connect_timeout,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            writer: Arc::new(Mutex::new(None)),
            incoming_tx,
            incoming_rx: Arc::new(Mutex::new(incoming_rx)),
            recv_task: Arc::new(Mutex::new(None)),
        })
    }

    /// Connection to the configured worker endpoint.
    pub fn from_config(config: &CalixConfig) -> Result<Self> {
        Self::new(&config.worker_url(), config.connect_timeout())
    }

    /// Worker endpoint URL.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// Connect to the worker and start the background read task.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if *state == ConnectionState::Connected {
                return Err(Error::AlreadyConnected);
            }
            *state = ConnectionState::Connecting;
        }

        let connected = timeout(self.connect_timeout, connect_async(self.url.as_str())).await;
        let (stream, _response) = match connected {
            Err(_) => {
                *self.state.write().await = ConnectionState::Disconnected;
                return Err(Error::Timeout(format!(
                    "connection timeout after {:?}",
                    self.connect_timeout
                )));
            }
            Ok(Err(e)) => {
                *self.state.write().await = ConnectionState::Disconnected;
                return Err(Error::WebSocket(e.to_string()));
            }
            Ok(Ok(pair)) => pair,
        };

        let (writer, mut reader) = stream.split();
        *self.writer.lock().await = Some(writer);
        *self.state.write().await = ConnectionState::Connected;

        let incoming_tx = self.incoming_tx.clone();
        let state = Arc::clone(&self.state);
        let worker_url = self.url.to_string();

        let task = tokio::spawn(async move {
            while let Some(frame) = reader.next().await {
                match frame {
                    Ok(Message::Text(text)) => match classify_reply(text.as_str()) {
                        Ok(reply) => {
                            if incoming_tx.send(ConnectionEvent::Reply(reply)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            // Unparseable frame: drop it, keep the connection.
                            warn!("bad frame from {}: {}", worker_url, e);
                        }
                    },
                    Ok(Message::Ping(payload)) => {
                        debug!("ping from {} ({} bytes)", worker_url, payload.len());
                    }
                    Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Binary(_)) => {}
                    Ok(Message::Frame(_)) => {}
                    Err(e) => {
                        warn!("websocket read error on {}: {}", worker_url, e);
                        let _ = incoming_tx.send(ConnectionEvent::Error(e.to_string()));
                        break;
                    }
                }
            }

            *state.write().await = ConnectionState::Disconnected;
            let _ = incoming_tx.send(ConnectionEvent::Closed);
        });

        *self.recv_task.lock().await = Some(task);
        Ok(())
    }

    /// Close the connection and stop the read task.
    pub async fn disconnect(&self) -> Result<()> {
        if let Some(mut writer) = self.writer.lock().await.take() {
            writer
                .send(Message::Close(None))
                .await
                .map_err(|e| Error::WebSocket(e.to_string()))?;
        }

        if let Some(task) = self.recv_task.lock().await.take() {
            task.abort();
        }

        *self.state.write().await = ConnectionState::Disconnected;
        Ok(())
    }

    /// Send one command frame. Fails unless Connected; nothing queues.
    pub async fn send(&self, command: &WorkerCommand) -> Result<()> {
        if self.state().await != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }
        let frame = command.to_frame()?;
        let mut writer_guard = self.writer.lock().await;
        let writer = writer_guard.as_mut().ok_or(Error::NotConnected)?;
        writer
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| Error::WebSocket(e.to_string()))
    }

    /// Next event from the read task.
    pub async fn recv(&self) -> Option<ConnectionEvent> {
        self.incoming_rx.lock().await.recv().await
    }
}
