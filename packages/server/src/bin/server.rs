//! Raffle relay server: synchronizes one admin and N viewers per room.
//!
//! Holds the authoritative per-room state (participants, winners, current
//! display) in memory and fans domain events out to every other connection
//! in the sending connection's room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin fukubiki-server
//! cargo run --bin fukubiki-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use fukubiki_server::{
    infrastructure::{InMemoryConnectionRegistry, InMemoryRoomStore, WebSocketEventPusher},
    ui::Server,
    usecase::{
        CurrentStateUseCase, GetRoomDetailUseCase, GetRoomsUseCase, GetStatsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, RelayEventUseCase, SyncStateUseCase,
    },
};
use fukubiki_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "fukubiki-server")]
#[command(about = "Live raffle relay server with room-based fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Clock / RoomStore / ConnectionRegistry / EventPusher
    // 2. UseCases
    // 3. Server

    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemoryRoomStore::new(clock.clone()));
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let pusher = Arc::new(WebSocketEventPusher::new());

    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        store.clone(),
        registry.clone(),
        pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
        store.clone(),
        registry.clone(),
        pusher.clone(),
    ));
    let relay_event_usecase = Arc::new(RelayEventUseCase::new(
        store.clone(),
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let sync_state_usecase = Arc::new(SyncStateUseCase::new(store.clone()));
    let current_state_usecase = Arc::new(CurrentStateUseCase::new(store.clone(), pusher.clone()));
    let get_stats_usecase = Arc::new(GetStatsUseCase::new(store.clone(), registry.clone()));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(store.clone(), registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(store, registry));

    let server = Server::new(
        join_room_usecase,
        leave_room_usecase,
        relay_event_usecase,
        sync_state_usecase,
        current_state_usecase,
        get_stats_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
