//! kotatsu CLI client.
//!
//! Connects to the relay, registers a display name and renders relay events.
//! Lines typed at the prompt are sent as chat messages; `/typing on`,
//! `/typing off` and `/seen` send the matching protocol events.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotatsu-client -- --name Alice
//! cargo run --bin kotatsu-client -- -n Bob --url ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use kotatsu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kotatsu-client")]
#[command(about = "CLI client for the kotatsu relay", long_about = None)]
struct Args {
    /// Display name shown to other participants
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = kotatsu_client::run_client(args.url, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
