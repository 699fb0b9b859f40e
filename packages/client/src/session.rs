//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use mitsumori_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, http::StatusCode, protocol::Message},
};

use super::{
    domain::{ClientCommand, HELP, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::{prompt, redisplay_prompt},
};

/// Join `room` as `name` and run until the user quits or the connection drops
///
/// # Arguments
///
/// * `url` - WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
/// * `room` - Room to join (created on first join)
/// * `name` - Display name shown to the other participants
pub async fn run_client(
    url: String,
    room: String,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = format!("{}?room={}", url, room);
    tracing::info!("Connecting to {} as '{}'", url, name);

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::BAD_REQUEST =>
        {
            return Err(Box::new(ClientError::InvalidRoom(room)));
        }
        Err(e) => return Err(Box::new(ClientError::ConnectionError(e.to_string()))),
    };

    let (mut write, mut read) = ws_stream.split();

    let join = serde_json::to_string(&ClientMessage::Join { name: name.clone() })?;
    write.send(Message::Text(join.into())).await?;

    tracing::info!("Joined room '{}'", room);
    println!(
        "\nYou are '{}' in room '{}'. Type /help for commands. Press Ctrl+C to exit.\n",
        name, room
    );

    // Spawn a task to handle incoming messages
    let name_for_read = name.clone();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(message) => {
                            MessageFormatter::format_server_message(&message, &name_for_read)
                        }
                        Err(_) => MessageFormatter::format_raw_message(&text),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
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

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = prompt(&name);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
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

    // Spawn a task to turn input lines into protocol messages
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let message = match parse_input(&line) {
                Ok(Some(ClientCommand::Send(message))) => message,
                Ok(Some(ClientCommand::Help)) => {
                    println!("{}", HELP);
                    redisplay_prompt(&name);
                    continue;
                }
                Ok(Some(ClientCommand::Quit)) => {
                    write.send(Message::Close(None)).await.ok();
                    break;
                }
                Ok(None) => continue,
                Err(e) => {
                    println!("{}", e);
                    redisplay_prompt(&name);
                    continue;
                }
            };

            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
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

    Ok(())
}
