//! Raffle CLI client with admin and viewer roles.
//!
//! The admin edits the roster and spins the wheel; viewers opened with
//! `--view` mirror the admin's screen. Both share one room chosen by
//! `--room`. Automatically reconnects on disconnection (max 5 attempts
//! with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fukubiki-client -- --room office-party
//! cargo run --bin fukubiki-client -- --room office-party --view
//! ```

use clap::Parser;

use fukubiki_client::{runner::run_client, state::Role};
use fukubiki_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "fukubiki-client")]
#[command(about = "Live raffle CLI client (admin or viewer)", long_about = None)]
struct Args {
    /// Room to join (opaque id, same for admin and viewers)
    #[arg(short = 'r', long)]
    room: String,

    /// Join as a passive viewer instead of the admin
    #[arg(short = 'v', long, default_value_t = false)]
    view: bool,

    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    let role = if args.view { Role::Viewer } else { Role::Admin };

    if let Err(e) = run_client(args.url, args.room, role).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
