//! WebSocket client session management.
//!
//! One session = one connection to the relay, joined to one room. The
//! admin gets a line-editing command loop; the viewer passively mirrors
//! relay events until the connection drops.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use fukubiki_server::infrastructure::dto::websocket::{
    ClientEvent, DRAW_SPIN_DURATION, ServerEvent,
};
use fukubiki_shared::time::now_millis;

use crate::{
    error::ClientError,
    formatter::{MessageFormatter, redisplay_prompt},
    selection,
    state::{ClientState, Role},
};

/// Run one client session against the relay.
pub async fn run_client_session(
    url: &str,
    room: &str,
    state: Arc<Mutex<ClientState>>,
) -> Result<(), Box<dyn std::error::Error>> {
    // The room id travels as a URL query parameter (shareable link)
    let url = format!("{}?room={}", url, room);

    let (ws_stream, response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(e) => {
            let error_msg = e.to_string();

            // HTTP 400 means the relay rejected the room id itself
            if error_msg.contains("400") || error_msg.contains("Bad Request") {
                return Err(Box::new(ClientError::ConnectionRejected(
                    room.to_string(),
                )));
            }

            return Err(Box::new(ClientError::ConnectionError(error_msg)));
        }
    };

    if response.status().as_u16() == 400 {
        return Err(Box::new(ClientError::ConnectionRejected(room.to_string())));
    }

    let role = state.lock().await.role();
    tracing::info!("Connected to room '{}' as {:?}", room, role);
    match role {
        Role::Admin => println!(
            "\nYou are the admin of room '{}'. Type 'help' for commands. Press Ctrl+C to exit.\n",
            room
        ),
        Role::Viewer => println!(
            "\nWatching room '{}'. The screen follows the admin. Press Ctrl+C to exit.\n",
            room
        ),
    }

    let (mut write, mut read) = ws_stream.split();

    // Outbound events from the command loop and draw timers
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();

    // Reconciliation on (re)connect: the viewer asks for the authoritative
    // snapshot; the admin pushes its own state as the authority.
    {
        let state_guard = state.lock().await;
        let event = match state_guard.role() {
            Role::Viewer => ClientEvent::RequestCurrentState,
            Role::Admin => ClientEvent::SyncState {
                participants: state_guard.roster.participants().to_vec(),
                winners: state_guard.roster.winners().to_vec(),
            },
        };
        out_tx.send(event).ok();
    }

    // Serialize and send outbound events
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(event) = out_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // Receive relay events, merge them into the mirror, display them
    let state_for_read = state.clone();
    let room_for_read = room.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            let mut state = state_for_read.lock().await;
                            state.apply_server_event(&event, now_millis());
                            if let Some(formatted) = format_event(&event, state.role()) {
                                print!("{}", formatted);
                                redisplay_prompt(&room_for_read);
                            }
                        }
                        Err(e) => {
                            tracing::debug!("Ignoring unparsable relay event: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Relay closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    match role {
        Role::Admin => {
            // Spawn a blocking thread for rustyline (synchronous readline)
            let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
            let prompt_room = room.to_string();
            let _readline_handle = std::thread::spawn(move || {
                let mut rl = match DefaultEditor::new() {
                    Ok(rl) => rl,
                    Err(e) => {
                        eprintln!("Failed to initialize readline: {}", e);
                        return;
                    }
                };

                let prompt = format!("{}> ", prompt_room);

                loop {
                    match rl.readline(&prompt) {
                        Ok(line) => {
                            let line = line.trim();
                            if !line.is_empty() {
                                rl.add_history_entry(line).ok();
                                if input_tx.send(line.to_string()).is_err() {
                                    break;
                                }
                            }
                        }
                        Err(ReadlineError::Interrupted) => {
                            tracing::info!("Interrupted");
                            break;
                        }
                        Err(ReadlineError::Eof) => {
                            tracing::info!("EOF");
                            break;
                        }
                        Err(err) => {
                            tracing::error!("Readline error: {}", err);
                            break;
                        }
                    }
                }
            });

            // Command loop until quit or connection loss
            let state_for_commands = state.clone();
            let out_for_commands = out_tx.clone();
            let mut command_task = tokio::spawn(async move {
                while let Some(line) = input_rx.recv().await {
                    if handle_command(&state_for_commands, &out_for_commands, &line).await {
                        break; // user quit
                    }
                }
            });

            tokio::select! {
                read_result = &mut read_task => {
                    write_task.abort();
                    command_task.abort();
                    if read_result.unwrap_or(false) {
                        return Err(Box::new(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        )));
                    }
                }
                _ = &mut command_task => {
                    read_task.abort();
                    write_task.abort();
                }
                write_result = &mut write_task => {
                    read_task.abort();
                    command_task.abort();
                    if write_result.unwrap_or(false) {
                        return Err(Box::new(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        )));
                    }
                }
            }
        }
        Role::Viewer => {
            tokio::select! {
                read_result = &mut read_task => {
                    write_task.abort();
                    if read_result.unwrap_or(false) {
                        return Err(Box::new(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        )));
                    }
                }
                write_result = &mut write_task => {
                    read_task.abort();
                    if write_result.unwrap_or(false) {
                        return Err(Box::new(ClientError::ConnectionError(
                            "Connection lost".to_string(),
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Handle one admin command line. Returns `true` when the user quits.
async fn handle_command(
    state: &Arc<Mutex<ClientState>>,
    out_tx: &mpsc::UnboundedSender<ClientEvent>,
    line: &str,
) -> bool {
    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "add" => {
            let (name, group) = match rest.split_once(';') {
                Some((name, group)) => (name.trim(), Some(group.trim())),
                None => (rest, None),
            };
            let mut state = state.lock().await;
            match state.roster.add(name, group, now_millis()) {
                Ok(added) => {
                    println!("Added {} [{}]", added.name, added.group);
                    push_participants(&state, out_tx);
                }
                Err(e) => println!("{}", e),
            }
        }

        "remove" => {
            let mut state = state.lock().await;
            match state.roster.remove_by_name(rest) {
                Some(removed) => {
                    println!("Removed {}", removed.name);
                    push_participants(&state, out_tx);
                }
                None => println!("'{}' is not on the roster", rest),
            }
        }

        "import" => {
            match std::fs::read_to_string(rest) {
                Ok(text) => {
                    let mut state = state.lock().await;
                    let summary = state.roster.import_csv(&text, now_millis());
                    print!("{}", MessageFormatter::format_import_summary(summary));
                    push_participants(&state, out_tx);
                }
                Err(e) => println!("Could not read '{}': {}", rest, e),
            }
        }

        "list" => {
            let state = state.lock().await;
            print!(
                "{}",
                MessageFormatter::format_participants(state.roster.participants())
            );
        }

        "winners" => {
            let state = state.lock().await;
            print!("{}", MessageFormatter::format_winners(state.roster.winners()));
        }

        "draw" => trigger_draw(state, out_tx).await,

        "dismiss" => {
            let mut state = state.lock().await;
            state.dismiss();
            out_tx.send(ClientEvent::CloseWinnerModal).ok();
            println!("Ready for the next draw");
        }

        "clear" => {
            let mut state = state.lock().await;
            state.roster.clear();
            push_participants(&state, out_tx);
            out_tx
                .send(ClientEvent::UpdateWinners {
                    winners: Vec::new(),
                })
                .ok();
            println!("Roster and winners cleared");
        }

        "help" => {
            println!("Commands:");
            println!("  add <name>[; <group>]  add one participant");
            println!("  remove <name>          remove a participant");
            println!("  import <file>          import a ;-separated CSV (seq;name;group)");
            println!("  list                   show the roster");
            println!("  winners                show past winners");
            println!("  draw                   spin the wheel");
            println!("  dismiss                close the winner announcement");
            println!("  clear                  reset roster and winners");
            println!("  quit                   exit");
        }

        "quit" | "exit" => return true,

        other => println!("Unknown command '{}' (try 'help')", other),
    }

    false
}

/// Start a draw: pick the winner once, announce the start, and schedule
/// the completion after the shared spin duration.
async fn trigger_draw(state: &Arc<Mutex<ClientState>>, out_tx: &mpsc::UnboundedSender<ClientEvent>) {
    let (participants, winner_id, target) = {
        let mut state = state.lock().await;
        if let Err(e) = state.begin_draw() {
            println!("{}", e);
            return;
        }

        let participants = state.roster.participants().to_vec();
        let index = selection::draw_winner_index(&mut rand::rng(), participants.len())
            .expect("roster is non-empty after begin_draw");
        let winner_id = participants[index].id.clone();
        let target = selection::wheel_target(index, participants.len());
        (participants, winner_id, target)
    };

    out_tx
        .send(ClientEvent::StartRaffle {
            participants: participants.clone(),
            winner_id: winner_id.clone(),
        })
        .ok();
    print!(
        "{}",
        MessageFormatter::format_raffle_started(participants.len(), target)
    );

    // The reveal happens after the protocol's shared presentation
    // duration; viewers run the same timer from raffle-started.
    let state = state.clone();
    let out_tx = out_tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(DRAW_SPIN_DURATION).await;

        let completed = {
            let mut state = state.lock().await;
            let winner_participant = state
                .roster
                .participants()
                .iter()
                .find(|p| p.id == winner_id)
                .cloned();
            winner_participant.and_then(|participant| {
                state
                    .finish_draw(&winner_id, now_millis())
                    .map(|record| (participant, record))
            })
        };

        if let Some((winner_participant, record)) = completed {
            out_tx
                .send(ClientEvent::CompleteRaffle {
                    winner: winner_participant.clone(),
                })
                .ok();
            out_tx
                .send(ClientEvent::ShowWinnerModal {
                    winner: winner_participant,
                })
                .ok();
            print!("{}", MessageFormatter::format_winner_announcement(&record));
        }
    });
}

/// Push the current participant list to the relay.
fn push_participants(state: &ClientState, out_tx: &mpsc::UnboundedSender<ClientEvent>) {
    out_tx
        .send(ClientEvent::UpdateParticipants {
            participants: state.roster.participants().to_vec(),
        })
        .ok();
}

/// Terminal rendering of one relay event. `None` for events that need no
/// notification line.
fn format_event(event: &ServerEvent, role: Role) -> Option<String> {
    match event {
        ServerEvent::ViewersCount { count } => {
            Some(MessageFormatter::format_viewer_count(*count))
        }

        // The remaining events only matter to the mirroring viewer; the
        // admin already displayed its own actions.
        _ if role == Role::Admin => None,

        ServerEvent::CurrentState {
            participants,
            winners,
            ..
        } => {
            let mut output = MessageFormatter::format_participants(participants);
            if !winners.is_empty() {
                output.push_str(&MessageFormatter::format_winners(winners));
            }
            Some(output)
        }

        ServerEvent::RaffleStarted {
            participants,
            winner_id,
        } => {
            // Same pure geometry as the admin: identical inputs, an
            // identical spin.
            let target = participants
                .iter()
                .position(|p| p.id == *winner_id)
                .and_then(|index| selection::wheel_target(index, participants.len()));
            Some(MessageFormatter::format_raffle_started(
                participants.len(),
                target,
            ))
        }

        ServerEvent::RaffleCompleted { winner } => Some(format!(
            "\n*** The wheel stopped on {} [{}] ***\n",
            winner.name, winner.group
        )),

        ServerEvent::ParticipantsUpdated { participants } => {
            Some(MessageFormatter::format_participants(participants))
        }

        ServerEvent::WinnersUpdated { winners } => {
            Some(MessageFormatter::format_winners(winners))
        }

        ServerEvent::ShowWinnerModal { winner } => Some(
            MessageFormatter::format_winner_modal(&winner.name, &winner.group),
        ),

        ServerEvent::CloseWinnerModal => {
            Some("\n(The winner announcement was closed)\n".to_string())
        }
    }
}
