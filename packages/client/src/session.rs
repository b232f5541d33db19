//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use kotatsu_server::infrastructure::dto::websocket::{
    ChatMessageDto, ClientEvent, HistoryMessage, LastSeenMessage, PresenceMessage, SeenMessage,
    TypingMessage,
};
use kotatsu_shared::time::now_millis;

use crate::{
    command::{InputCommand, parse_input},
    error::ClientError,
    formatter::EventFormatter,
    ui::redisplay_prompt,
};

/// Run one WebSocket client session
pub async fn run_client_session(url: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to the relay!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send.\n\
         Commands: /typing on, /typing off, /seen, /quit\n",
        name
    );

    let (mut write, mut read) = ws_stream.split();

    // Register the display name before anything else
    let register = ClientEvent::Register {
        name: name.to_string(),
    };
    let register_json = serde_json::to_string(&register)?;
    write
        .send(Message::Text(register_json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // Clone name for the read task
    let name_for_read = name.to_string();

    // Spawn a task to handle incoming frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    // Each frame type has a distinct required field set, so
                    // parsing in order picks the right one.
                    if let Ok(history) = serde_json::from_str::<HistoryMessage>(&text) {
                        print!("{}", EventFormatter::format_history(&history.messages));
                    } else if let Ok(presence) = serde_json::from_str::<PresenceMessage>(&text) {
                        print!(
                            "{}",
                            EventFormatter::format_presence(
                                presence.connection_count,
                                &presence.names
                            )
                        );
                    } else if let Ok(typing) = serde_json::from_str::<TypingMessage>(&text) {
                        print!("{}", EventFormatter::format_typing(&typing.entries));
                    } else if let Ok(last_seen) = serde_json::from_str::<LastSeenMessage>(&text) {
                        print!("{}", EventFormatter::format_last_seen(&last_seen.seen));
                    } else if let Ok(chat) = serde_json::from_str::<ChatMessageDto>(&text) {
                        print!(
                            "{}",
                            EventFormatter::format_chat_message(&chat.name, &chat.text, chat.sent_at)
                        );
                    } else if let Ok(seen) = serde_json::from_str::<SeenMessage>(&text) {
                        print!("{}", EventFormatter::format_seen(&seen));
                    } else {
                        print!("{}", EventFormatter::format_raw_message(&text));
                    }
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

    // Clone name for the input loop
    let name = name.to_string();
    let name_for_prompt = name.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", name_for_prompt);

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

    // Spawn a task to turn input lines into protocol events
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let event = match parse_input(&line) {
                Some(InputCommand::Message(text)) => ClientEvent::Message {
                    name: name.clone(),
                    text,
                    timestamp: Some(now_millis()),
                },
                Some(InputCommand::Typing(typing)) => ClientEvent::Typing {
                    name: name.clone(),
                    typing,
                },
                Some(InputCommand::Seen) => ClientEvent::Seen {
                    name: name.clone(),
                    timestamp: Some(now_millis()),
                },
                Some(InputCommand::Quit) => break,
                Some(InputCommand::Unknown(cmd)) => {
                    println!("Unknown command: {}", cmd);
                    redisplay_prompt(&name);
                    continue;
                }
                None => continue,
            };

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

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}
