//! WebSocket connection handlers.
//!
//! The join intent (`joinCodeBlock` in the client protocol) is carried by the
//! upgrade request itself: `GET /ws?code_block_id={id}`. An unknown id is
//! rejected with 404 before the upgrade.

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
use tokio::sync::mpsc;

use crate::{
    domain::{CodeBlockId, CodeContent, ConnectionIdFactory},
    infrastructure::dto::websocket::{CodeChangeMessage, MessageType},
    ui::state::{AppState, ConnectQuery, SEND_QUEUE_CAPACITY},
    usecase::{ApplyEditUseCase, DisconnectParticipantUseCase, JoinRoomUseCase, LeaveOutcome},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> CodeBlockId (Domain Model)
    let code_block_id = match CodeBlockId::try_from(query.code_block_id.clone()) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!("Invalid code_block_id format: '{}'", query.code_block_id);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    // Reject unknown code blocks before the upgrade
    if state.repository.get_code_block(&code_block_id).await.is_err() {
        tracing::warn!("Join rejected, unknown code block '{}'", code_block_id);
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, code_block_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, code_block_id: CodeBlockId) {
    // Each connection owns its id and its bounded outbound queue
    let connection_id = ConnectionIdFactory::generate();
    let (tx, mut rx) = mpsc::channel(SEND_QUEUE_CAPACITY);

    let join_usecase = JoinRoomUseCase::new(state.repository.clone(), state.registry.clone());
    match join_usecase.execute(&code_block_id, &connection_id, tx).await {
        Ok(joined) => {
            tracing::info!(
                "Connection '{}' joined room '{}' as {} ({} students)",
                connection_id,
                code_block_id,
                joined.role.as_str(),
                joined.student_count
            );
        }
        Err(e) => {
            tracing::warn!(
                "Connection '{}' failed to join room '{}': {}",
                connection_id,
                code_block_id,
                e
            );
            return;
        }
    }

    let (mut sender, mut receiver) = socket.split();

    // Spawn a task to drain this connection's queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // Spawn a task to receive edits from this client
    let recv_connection_id = connection_id.clone();
    let recv_code_block_id = code_block_id.clone();
    let edit_usecase = ApplyEditUseCase::new(state.registry.clone());
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let change = match serde_json::from_str::<CodeChangeMessage>(&text) {
                        Ok(change) if change.r#type == MessageType::CodeChange => change,
                        Ok(change) => {
                            tracing::warn!(
                                "Unexpected message type {:?} from '{}'",
                                change.r#type,
                                recv_connection_id
                            );
                            continue;
                        }
                        Err(e) => {
                            tracing::warn!("Failed to parse message as codeChange: {}", e);
                            continue;
                        }
                    };

                    // Convert String -> Domain Model
                    let code = match CodeContent::try_from(change.code) {
                        Ok(code) => code,
                        Err(e) => {
                            tracing::warn!(
                                "Rejected edit from '{}': {}",
                                recv_connection_id,
                                e
                            );
                            continue;
                        }
                    };

                    match edit_usecase
                        .execute(&recv_code_block_id, &recv_connection_id, code)
                        .await
                    {
                        Ok(delivered) => {
                            tracing::debug!(
                                "Edit from '{}' broadcast to {} connections",
                                recv_connection_id,
                                delivered
                            );
                        }
                        Err(e) => {
                            tracing::warn!("Failed to apply edit: {}", e);
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
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

    // Every departure (explicit close or transport drop) funnels into the
    // disconnect usecase
    let disconnect_usecase = DisconnectParticipantUseCase::new(state.registry.clone());
    match disconnect_usecase.execute(&code_block_id, &connection_id).await {
        LeaveOutcome::StudentLeft { student_count } => {
            tracing::info!(
                "Student '{}' left room '{}' ({} students remain)",
                connection_id,
                code_block_id,
                student_count
            );
        }
        LeaveOutcome::MentorLeft { notified } => {
            tracing::info!(
                "Mentor '{}' left room '{}', notified {} participants and dissolved the room",
                connection_id,
                code_block_id,
                notified
            );
        }
        LeaveOutcome::RoomEmptied => {
            tracing::info!(
                "Room '{}' emptied after '{}' left, dissolved silently",
                code_block_id,
                connection_id
            );
        }
        LeaveOutcome::AlreadyGone => {
            tracing::debug!(
                "Connection '{}' disconnected after room '{}' was dissolved",
                connection_id,
                code_block_id
            );
        }
    }
}
