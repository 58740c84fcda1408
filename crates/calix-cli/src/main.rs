//! Calix — console and bubble query client for the local bubble worker.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use calix_bubble::BubbleSurface;
use calix_core::CalixConfig;

mod repl;
mod worker_router;

use worker_router::WorkerRouter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = CalixConfig::from_env();
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "ask" => {
                if args.len() < 3 {
                    eprintln!("Usage: calix ask <query>");
                    std::process::exit(1);
                }
                let query = args[2..].join(" ");
                let router = Arc::new(WorkerRouter::new(&config)?);
                let bubble = BubbleSurface::new(router);
                bubble.submit(&query).await;
                for line in bubble.transcript().rendered() {
                    println!("{}", line);
                }
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Calix — client for the Cali X One bubble worker");
                println!();
                println!("Usage: calix [command]");
                println!();
                println!("Commands:");
                println!("  (none)           Interactive worker console");
                println!("  ask <query>      One-shot bubble query");
                println!("  help             Show this help");
                println!();
                println!("Environment:");
                println!("  CALIX_WORKER_PORT   Worker WebSocket port (default 9997)");
                println!("  RUST_LOG            Log filter (default warn)");
                return Ok(());
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'calix help' for usage.");
                std::process::exit(1);
            }
        }
    }

    repl::run(&config).await
}
