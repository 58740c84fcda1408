//! Round-trip tests against an in-process stub bubble worker.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use calix_console::{Connection, ConnectionEvent, ConnectionState, Console};
use calix_core::CalixConfig;
use calix_protocol::{WorkerCommand, WorkerReply};

/// Stub worker speaking the bubble worker protocol on a loopback port.
async fn spawn_stub_worker() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let ws = accept_async(stream).await.unwrap();
                let (mut writer, mut reader) = ws.split();

                while let Some(Ok(Message::Text(text))) = reader.next().await {
                    let request: Value = serde_json::from_str(text.as_str()).unwrap();
                    let reply = match request.get("type").and_then(Value::as_str) {
                        Some("cli_command") => {
                            let command = request
                                .get("command")
                                .and_then(Value::as_str)
                                .unwrap_or_default();
                            json!({
                                "command": command,
                                "stdout": format!("ran: {}", command),
                                "stderr": "",
                            })
                        }
                        Some("system_info") => {
                            json!({"worker_id": "stub-worker", "active_sessions": 1})
                        }
                        Some("ping") => json!({"type": "pong"}),
                        _ => json!({"error": "unknown command"}),
                    };
                    if writer
                        .send(Message::Text(reply.to_string().into()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }
    });

    port
}

fn connection_to(port: u16) -> Connection {
    Connection::new(
        &format!("ws://127.0.0.1:{}", port),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn test_connect_send_receive_disconnect() {
    let port = spawn_stub_worker().await;
    let connection = connection_to(port);

    connection.connect().await.unwrap();
    assert_eq!(connection.state().await, ConnectionState::Connected);

    connection
        .send(&WorkerCommand::CliCommand {
            command: "echo hi".to_string(),
        })
        .await
        .unwrap();

    let event = connection.recv().await.unwrap();
    assert_eq!(
        event,
        ConnectionEvent::Reply(WorkerReply::CommandResult {
            command: Some("echo hi".to_string()),
            stdout: "ran: echo hi".to_string(),
            stderr: Some(String::new()),
        })
    );

    connection.disconnect().await.unwrap();
    assert_eq!(connection.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_while_connected_is_rejected() {
    let port = spawn_stub_worker().await;
    let connection = connection_to(port);

    connection.connect().await.unwrap();
    let err = connection.connect().await.unwrap_err();
    assert!(err.to_string().contains("Already connected"));

    connection.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_connect_refused_leaves_disconnected() {
    // Bind-then-drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let connection = connection_to(port);
    assert!(connection.connect().await.is_err());
    assert_eq!(connection.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_console_session() {
    let port = spawn_stub_worker().await;
    let config = CalixConfig {
        worker_port: port,
        ..CalixConfig::default()
    };
    let console = Console::new(&config).unwrap();

    console.toggle_connection().await;
    assert_eq!(console.state().await, ConnectionState::Connected);
    assert_eq!(console.status_text().await, "Connected to Cali X One");
    assert_eq!(console.toggle_label().await, "Disconnect");

    console.send_command("uptime").await;
    let event = console.next_event().await.unwrap();
    console.apply(event);

    console.ping().await;
    let event = console.next_event().await.unwrap();
    console.apply(event);

    console.system_info().await;
    let event = console.next_event().await.unwrap();
    console.apply(event);

    console.toggle_connection().await;
    assert_eq!(console.state().await, ConnectionState::Disconnected);

    assert_eq!(
        console.transcript().texts(),
        vec![
            "Connected to Bubble Worker",
            "$ uptime",
            "ran: uptime",
            "Pong from server",
            "System Info: Worker stub-worker, 1 sessions",
            "Disconnected from Bubble Worker",
        ]
    );
}

#[tokio::test]
async fn test_remote_close_emits_closed_event() {
    // Worker that accepts and immediately closes.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.close(None).await.unwrap();
    });

    let connection = connection_to(port);
    connection.connect().await.unwrap();

    assert_eq!(connection.recv().await, Some(ConnectionEvent::Closed));
    assert_eq!(connection.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_read_error_is_surfaced_then_closed() {
    // Worker that drops the socket without a close handshake; the
    // client read fails instead of seeing a clean close.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        drop(ws);
    });

    let connection = connection_to(port);
    connection.connect().await.unwrap();

    match connection.recv().await {
        Some(ConnectionEvent::Error(_)) => {}
        other => panic!("expected a transport error event, got {:?}", other),
    }
    assert_eq!(connection.recv().await, Some(ConnectionEvent::Closed));
    assert_eq!(connection.state().await, ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_read_error_renders_as_log_line() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        drop(ws);
    });

    let config = CalixConfig {
        worker_port: port,
        ..CalixConfig::default()
    };
    let console = Console::new(&config).unwrap();
    console.toggle_connection().await;

    let event = console.next_event().await.unwrap();
    console.apply(event);
    let event = console.next_event().await.unwrap();
    console.apply(event);

    let texts = console.transcript().texts();
    assert_eq!(texts[0], "Connected to Bubble Worker");
    assert!(texts[1].starts_with("WebSocket error: "));
    assert_eq!(texts[2], "Disconnected from Bubble Worker");
}

#[tokio::test]
async fn test_toggle_from_connected_closes_then_reopens() {
    let port = spawn_stub_worker().await;
    let config = CalixConfig {
        worker_port: port,
        ..CalixConfig::default()
    };
    let console = Console::new(&config).unwrap();

    console.toggle_connection().await;
    assert_eq!(console.state().await, ConnectionState::Connected);

    // Each toggle is a complete transition: the first closes, the
    // second sees Disconnected and opens a fresh connection. The
    // original popup behaved the same way (a second click during
    // teardown reconnected rather than staying down).
    console.toggle_connection().await;
    assert_eq!(console.state().await, ConnectionState::Disconnected);
    assert_eq!(console.status_text().await, "Disconnected");

    console.toggle_connection().await;
    assert_eq!(console.state().await, ConnectionState::Connected);

    assert_eq!(
        console.transcript().texts(),
        vec![
            "Connected to Bubble Worker",
            "Disconnected from Bubble Worker",
            "Connected to Bubble Worker",
        ]
    );
}
