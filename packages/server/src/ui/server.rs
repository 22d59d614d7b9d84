//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    CurrentStateUseCase, GetRoomDetailUseCase, GetRoomsUseCase, GetStatsUseCase, JoinRoomUseCase,
    LeaveRoomUseCase, RelayEventUseCase, SyncStateUseCase,
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket raffle relay server
///
/// Encapsulates the wired use-case objects and runs the axum router.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(/* use cases */);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    join_room_usecase: Arc<JoinRoomUseCase>,
    leave_room_usecase: Arc<LeaveRoomUseCase>,
    relay_event_usecase: Arc<RelayEventUseCase>,
    sync_state_usecase: Arc<SyncStateUseCase>,
    current_state_usecase: Arc<CurrentStateUseCase>,
    get_stats_usecase: Arc<GetStatsUseCase>,
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        relay_event_usecase: Arc<RelayEventUseCase>,
        sync_state_usecase: Arc<SyncStateUseCase>,
        current_state_usecase: Arc<CurrentStateUseCase>,
        get_stats_usecase: Arc<GetStatsUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    ) -> Self {
        Self {
            join_room_usecase,
            leave_room_usecase,
            relay_event_usecase,
            sync_state_usecase,
            current_state_usecase,
            get_stats_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
        }
    }

    /// Run the relay server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the address or if
    /// serving fails.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            join_room_usecase: self.join_room_usecase,
            leave_room_usecase: self.leave_room_usecase,
            relay_event_usecase: self.relay_event_usecase,
            sync_state_usecase: self.sync_state_usecase,
            current_state_usecase: self.current_state_usecase,
            get_stats_usecase: self.get_stats_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Raffle relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws?room=<room-id>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
