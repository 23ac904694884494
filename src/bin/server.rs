//! # Server Binary Entry Point
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin server -- 5000
//! cargo run --bin server -- 5000 --mode text --reply "Hola que tal"
//! cargo run --bin server -- --config config/server.toml --concurrent
//! cargo run --bin server            # asks for the port
//! ```
//!
//! The server will:
//! 1. Load the optional TOML configuration and apply command-line overrides
//! 2. Ask for the port on stdin if none was given
//! 3. Bind and listen
//! 4. Serve one client (or, with `--concurrent`, every client until Ctrl-C)
//!
//! Exits with status 1 if any step fails.

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;

use tcp_exchange::common::config::{load_config, ExchangeMode};
use tcp_exchange::common::logging::init_logger;
use tcp_exchange::server::config::{ServerConfig, ServerOverrides};
use tcp_exchange::server::Server;

/// Command-line arguments for the server binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on; asked for interactively when omitted
    port: Option<u16>,

    /// Path to the server configuration file (TOML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Address to bind (default 0.0.0.0)
    #[arg(long)]
    host: Option<String>,

    /// Exchange to run with each client
    #[arg(short, long, value_enum)]
    mode: Option<ExchangeMode>,

    /// Pending-connection queue length (default 1)
    #[arg(long)]
    backlog: Option<u32>,

    /// Fixed answer for text mode; echoes the message when omitted
    #[arg(long)]
    reply: Option<String>,

    /// Keep accepting clients, one task each, until Ctrl-C
    #[arg(long)]
    concurrent: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger();

    let args = Args::parse();

    match run(args).await {
        Ok(true) => info!("👋 Accept loop stopped. Server terminated."),
        Ok(false) => info!("👋 Connection closed. Server terminated."),
        Err(e) => {
            error!("❌ {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the server ran the concurrent accept loop.
async fn run(args: Args) -> anyhow::Result<bool> {
    let config: ServerConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    let overrides = ServerOverrides {
        host: args.host,
        port: args.port,
        backlog: args.backlog,
        mode: args.mode,
        reply: args.reply,
        concurrent: args.concurrent,
    };
    let (port, mut settings) = config.resolve(overrides);

    if port.is_none() {
        settings.port = prompt_port().await?;
    }

    let server = Server::bind(settings)?;

    let concurrent = server.settings().concurrent;
    if concurrent {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("⏹️  Ctrl-C received, shutting down");
                let _ = shutdown_tx.send(true);
            }
        });

        server.serve(shutdown_rx).await?;
    } else {
        server.run_once().await?;
    }

    Ok(concurrent)
}

async fn prompt_port() -> anyhow::Result<u16> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Enter the port to listen on: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read the port")?;

    line.trim()
        .parse()
        .with_context(|| format!("invalid port {:?}", line.trim()))
}
