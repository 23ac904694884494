//! # Client Binary Entry Point
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin client -- 127.0.0.1 5000                # increment exchange
//! cargo run --bin client -- 127.0.0.1 5000 --mode text    # one text message
//! ```
//!
//! Exits with status 1 if the connection or the exchange fails.

use clap::Parser;
use log::error;
use tokio::io::BufReader;

use tcp_exchange::client::{console, Client};
use tcp_exchange::common::config::ExchangeMode;
use tcp_exchange::common::logging::init_logger;

/// Command-line arguments for the client binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address or host name
    host: String,

    /// Server port
    port: u16,

    /// Exchange to run with the server
    #[arg(short, long, value_enum, default_value_t = ExchangeMode::Increment)]
    mode: ExchangeMode,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut client = Client::connect(&args.host, args.port).await?;
    println!("Connected to the server.");

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    match args.mode {
        ExchangeMode::Increment => {
            console::run_increment(&mut client, input, &mut output).await?;
        }
        ExchangeMode::Text => {
            console::run_text(&mut client, input, &mut output).await?;
        }
    }

    Ok(())
}
