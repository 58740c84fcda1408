//! Interactive console REPL over stdin.

use tokio::io::{AsyncBufReadExt, BufReader};

use calix_console::{Console, ConnectionState};
use calix_core::CalixConfig;

/// Run the interactive console until `:quit` or end of input.
pub async fn run(config: &CalixConfig) -> anyhow::Result<()> {
    let console = Console::new(config)?;

    println!("Calix console — worker at {}", config.worker_url());
    println!(":connect toggles the connection, :info, :ping, :quit; anything else runs as a CLI command.");

    // The popup auto-connected on open; do the same.
    console.toggle_connection().await;
    let mut printed = flush(&console, 0);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "" => {}
                    ":quit" | ":q" => break,
                    ":connect" => console.toggle_connection().await,
                    ":info" => console.system_info().await,
                    ":ping" => console.ping().await,
                    command => console.send_command(command).await,
                }
                printed = flush(&console, printed);
            }
            event = console.next_event() => {
                let Some(event) = event else { break };
                console.apply(event);
                printed = flush(&console, printed);
            }
        }
    }

    if console.state().await == ConnectionState::Connected {
        console.toggle_connection().await;
        flush(&console, printed);
    }

    Ok(())
}

/// Print transcript lines added since the last flush.
fn flush(console: &Console, from: usize) -> usize {
    for line in console.transcript().rendered_from(from) {
        println!("{}", line);
    }
    console.transcript().len()
}
