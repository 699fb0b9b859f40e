//! WebSocket connection handlers.

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
    domain::RoomId,
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

/// Room used when the client does not ask for one
pub const DEFAULT_ROOM: &str = "default";

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub room: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let room = query.room.unwrap_or_else(|| DEFAULT_ROOM.to_string());

    // Convert String -> RoomId (Domain Model)
    let room_id = match RoomId::new(room.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid room id '{}': {}", room, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_id)))
}

/// Spawns a task that forwards encoded events from the rx channel to the WebSocket sender.
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_id: RoomId) {
    // Registered after the upgrade; released by the disconnect below
    let (tx, rx) = mpsc::unbounded_channel();
    let participant_id = state.connect_participant_usecase.execute(tx).await;
    tracing::info!(
        "Connection '{}' registered for room '{}'",
        participant_id,
        room_id
    );

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let room_id_clone = room_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", participant_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", participant_id, text);

                    let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(msg) => msg,
                        Err(e) => {
                            tracing::warn!(
                                "Dropped malformed frame from '{}': {}",
                                participant_id,
                                e
                            );
                            continue;
                        }
                    };

                    // Rejections are logged (and optionally reported) by the use case
                    let _ = state_clone
                        .dispatch_command_usecase
                        .execute(&room_id_clone, client_msg.into_command(participant_id))
                        .await;
                }
                Message::Binary(_) => {
                    tracing::warn!("Dropped binary frame from '{}'", participant_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", participant_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward room events to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let left = state
        .disconnect_participant_usecase
        .execute(&room_id, participant_id)
        .await;
    if left {
        tracing::info!("Participant '{}' left room '{}'", participant_id, room_id);
    } else {
        tracing::info!("Connection '{}' closed before joining", participant_id);
    }
}
