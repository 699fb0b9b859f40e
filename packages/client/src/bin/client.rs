//! Terminal planning poker participant.
//!
//! Joins a room on a running server and lets you start rounds, vote and reset
//! from the command line. Room updates from other participants are printed as
//! they arrive.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin mitsumori-client -- --name Alice
//! cargo run --bin mitsumori-client -- -n Bob -r sprint-42 -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use mitsumori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "mitsumori-client")]
#[command(about = "Terminal client for planning poker rooms", long_about = None)]
struct Args {
    /// Display name shown to the other participants
    #[arg(short = 'n', long)]
    name: String,

    /// Room to join (created on first join)
    #[arg(short = 'r', long, default_value = "default")]
    room: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = mitsumori_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
