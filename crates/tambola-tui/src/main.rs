//! Tambola TUI entry point.
//!
//! # Usage
//!
//! ```bash
//! # Local server, type the name with each command
//! tambola-tui
//!
//! # Remote server with a default name and a longer banner
//! tambola-tui --server wss://tambola.example --name Alice --banner-ms 4000
//! ```

use std::{fs::OpenOptions, sync::Mutex, time::Duration};

use clap::Parser;
use tambola_client::ClientConfig;
use tambola_tui::{Runtime, SystemEnv, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tambola terminal client
#[derive(Parser, Debug)]
#[command(name = "tambola-tui")]
#[command(about = "Terminal client for Tambola rooms")]
#[command(version)]
struct Args {
    /// WebSocket address of the room server
    #[arg(short, long, default_value = "ws://127.0.0.1:10000")]
    server: String,

    /// Name used when /create or /join leaves it out
    #[arg(short, long)]
    name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file; the terminal itself is taken by the UI
    #[arg(long, default_value = "tambola-tui.log")]
    log_file: String,

    /// How long claim banners stay up, in milliseconds
    #[arg(long, default_value = "2500")]
    banner_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = OpenOptions::new().create(true).append(true).open(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    tracing::info!(server = %args.server, "Tambola TUI starting");

    let config = ClientConfig { banner_lifetime: Duration::from_millis(args.banner_ms) };
    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, SystemEnv::new(), config, args.server);
    if let Some(name) = args.name {
        runtime.app_mut().set_default_name(name);
    }

    runtime.run().await?;

    Ok(())
}
