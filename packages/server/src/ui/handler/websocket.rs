//! WebSocket connection handler: the transport edge of the event relay.
//!
//! Each connection joins exactly one room, chosen by the `room` query
//! parameter of the upgrade request. Inbound frames are parsed into
//! tagged `ClientEvent` variants and dispatched to the use-case layer;
//! outbound events arrive through the connection's pusher channel.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomId},
    infrastructure::dto::{
        conversion::{participants_from_dto, winners_from_dto},
        websocket::{ClientEvent, ServerEvent},
    },
    ui::state::AppState,
    usecase::RelayError,
};

/// Query parameters for the WebSocket upgrade request.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Room ids are opaque, untrusted strings; validate shape only
    let room_id = match RoomId::try_from(query.room.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Rejecting connection with invalid room id: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let connection_id = ConnectionId::generate();

    // Create the outbound channel for this connection
    let (tx, rx) = mpsc::unbounded_channel();

    let viewer_count = state
        .join_room_usecase
        .execute(connection_id.clone(), room_id.clone(), tx)
        .await;

    tracing::info!(
        "Connection '{}' joined room '{}' ({} viewers)",
        connection_id,
        room_id,
        viewer_count
    );

    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state, room_id, connection_id, rx, viewer_count)
    }))
}

/// Spawns the task that drains the connection's pusher channel into the
/// WebSocket sink. Per-connection FIFO: events are delivered in the order
/// the relay pushed them.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
    viewer_count: usize,
) {
    let (sender, mut receiver) = socket.split();

    // Broadcast the self-inclusive viewer count to the whole room,
    // including the connection that just joined.
    {
        let count = ServerEvent::ViewersCount {
            count: viewer_count,
        };
        let count_json = serde_json::to_string(&count).unwrap();
        state
            .join_room_usecase
            .broadcast_viewer_count(&room_id, &count_json)
            .await;
    }

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();
    let connection_id_clone = connection_id.clone();

    // Receive events from this connection and dispatch them
    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            dispatch_event(
                                &state_clone,
                                &room_id_clone,
                                &connection_id_clone,
                                event,
                            )
                            .await;
                        }
                        Err(e) => {
                            // Best-effort: malformed events are dropped
                            tracing::warn!("Ignoring unparsable event: {}", e);
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Leave the room and broadcast the updated count to whoever remains
    if let Some((left_room, remaining)) = state.leave_room_usecase.execute(&connection_id).await {
        tracing::info!(
            "Connection '{}' left room '{}' ({} viewers remain)",
            connection_id,
            left_room,
            remaining
        );
        if remaining > 0 {
            let count_json =
                serde_json::to_string(&ServerEvent::ViewersCount { count: remaining }).unwrap();
            state
                .leave_room_usecase
                .broadcast_viewer_count(&left_room, &count_json)
                .await;
        }
    }
}

/// Event dispatch: one arm per inbound event kind.
async fn dispatch_event(
    state: &Arc<AppState>,
    room_id: &RoomId,
    connection_id: &ConnectionId,
    event: ClientEvent,
) {
    match event {
        ClientEvent::RequestCurrentState => {
            let snapshot = state.current_state_usecase.execute(room_id).await;
            let reply = ServerEvent::CurrentState {
                participants: snapshot.participants.into_iter().map(Into::into).collect(),
                winners: snapshot.winners.into_iter().map(Into::into).collect(),
                current_display: snapshot.display,
            };
            let reply_json = serde_json::to_string(&reply).unwrap();
            state
                .current_state_usecase
                .reply_to(connection_id, &reply_json)
                .await;
        }

        ClientEvent::SyncState {
            participants,
            winners,
        } => {
            state
                .sync_state_usecase
                .execute(
                    room_id,
                    participants_from_dto(participants),
                    winners_from_dto(winners),
                )
                .await;
            tracing::debug!("Synced authoritative state for room '{}'", room_id);
        }

        ClientEvent::UpdateParticipants { participants } => {
            let event_json = serde_json::to_string(&ServerEvent::ParticipantsUpdated {
                participants: participants.clone(),
            })
            .unwrap();
            if let Err(e) = state
                .relay_event_usecase
                .update_participants(
                    room_id,
                    connection_id,
                    participants_from_dto(participants),
                    &event_json,
                )
                .await
            {
                tracing::warn!("update-participants failed for '{}': {}", room_id, e);
            }
        }

        ClientEvent::UpdateWinners { winners } => {
            let event_json = serde_json::to_string(&ServerEvent::WinnersUpdated {
                winners: winners.clone(),
            })
            .unwrap();
            if let Err(e) = state
                .relay_event_usecase
                .update_winners(room_id, connection_id, winners_from_dto(winners), &event_json)
                .await
            {
                tracing::warn!("update-winners failed for '{}': {}", room_id, e);
            }
        }

        ClientEvent::StartRaffle {
            participants,
            winner_id,
        } => {
            let participant_count = participants.len();
            let event_json = serde_json::to_string(&ServerEvent::RaffleStarted {
                participants,
                winner_id,
            })
            .unwrap();
            match state
                .relay_event_usecase
                .start_raffle(room_id, connection_id, participant_count, &event_json)
                .await
            {
                Ok(_) => tracing::info!("Raffle started in room '{}'", room_id),
                Err(RelayError::EmptyRoster) => {
                    tracing::warn!(
                        "Rejected start-raffle with empty roster in room '{}'",
                        room_id
                    );
                }
                Err(e) => tracing::warn!("start-raffle failed for '{}': {}", room_id, e),
            }
        }

        ClientEvent::CompleteRaffle { winner } => {
            let event_json = serde_json::to_string(&ServerEvent::RaffleCompleted {
                winner: winner.clone(),
            })
            .unwrap();
            match winner.try_into() {
                Ok(winner_participant) => {
                    if let Err(e) = state
                        .relay_event_usecase
                        .complete_raffle(room_id, connection_id, &winner_participant, &event_json)
                        .await
                    {
                        tracing::warn!("complete-raffle failed for '{}': {}", room_id, e);
                    } else {
                        tracing::info!("Raffle completed in room '{}'", room_id);
                    }
                }
                Err(e) => tracing::warn!("Ignoring complete-raffle with invalid winner: {}", e),
            }
        }

        ClientEvent::ShowWinnerModal { winner } => {
            // The serialized winner doubles as the display blob a late
            // joiner needs to render the same announcement screen.
            let display_blob = serde_json::to_string(&winner).unwrap();
            let event_json =
                serde_json::to_string(&ServerEvent::ShowWinnerModal { winner }).unwrap();
            if let Err(e) = state
                .relay_event_usecase
                .show_winner_modal(room_id, connection_id, display_blob, &event_json)
                .await
            {
                tracing::warn!("show-winner-modal failed for '{}': {}", room_id, e);
            }
        }

        ClientEvent::CloseWinnerModal => {
            let event_json = serde_json::to_string(&ServerEvent::CloseWinnerModal).unwrap();
            if let Err(e) = state
                .relay_event_usecase
                .close_winner_modal(room_id, connection_id, &event_json)
                .await
            {
                tracing::warn!("close-winner-modal failed for '{}': {}", room_id, e);
            }
        }
    }
}
