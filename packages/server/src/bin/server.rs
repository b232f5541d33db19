//! kotatsu relay server.
//!
//! Accepts WebSocket connections and fans out messages, presence, typing and
//! seen-receipt updates to every connected client. With Firestore
//! credentials configured, message history is persisted and reloaded on
//! startup; without them the relay runs memory-only.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotatsu-server
//! cargo run --bin kotatsu-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;

use kotatsu_server::{
    domain::{
        HISTORY_CAPACITY, HistoryBuffer, LastSeenLedger, MessageStore, SessionRegistry,
        TypingTracker,
    },
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        store::{FirestoreConfig, FirestoreMessageStore},
    },
    ui::Server,
    usecase::{
        ConnectUseCase, DisconnectUseCase, RegisterUseCase, SeenUseCase, SendMessageUseCase,
        TypingUseCase,
    },
};
use kotatsu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kotatsu-server")]
#[command(about = "Realtime message relay with presence and typing fan-out", long_about = None)]
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
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registries (in-memory state)
    // 2. MessagePusher
    // 3. Optional MessageStore + history preload
    // 4. UseCases
    // 5. Server

    // 1. Create the owned registries
    let history = Arc::new(Mutex::new(HistoryBuffer::new()));
    let sessions = Arc::new(Mutex::new(SessionRegistry::new()));
    let typing = Arc::new(Mutex::new(TypingTracker::new()));
    let last_seen = Arc::new(Mutex::new(LastSeenLedger::new()));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Persistence is a capability selected once from configuration
    let store: Option<Arc<dyn MessageStore>> = match FirestoreConfig::from_env() {
        Some(config) => {
            tracing::info!(
                "Firestore persistence enabled (project '{}')",
                config.project_id
            );
            Some(Arc::new(FirestoreMessageStore::new(config)))
        }
        None => {
            tracing::info!("Firestore credentials not configured, running memory-only");
            None
        }
    };

    // Preload history before accepting the first connection so early
    // connections see a consistent initial view. A failed load degrades to
    // an empty buffer instead of aborting startup.
    if let Some(store) = &store {
        match store.load_recent(HISTORY_CAPACITY).await {
            Ok(messages) => {
                tracing::info!("Loaded {} messages from the durable store", messages.len());
                history.lock().await.reload(messages);
            }
            Err(e) => {
                tracing::warn!("Failed to load history, starting with an empty buffer: {}", e);
            }
        }
    }

    // 4. Create UseCases
    let connect_usecase = Arc::new(ConnectUseCase::new(
        history.clone(),
        sessions.clone(),
        typing.clone(),
        last_seen.clone(),
        message_pusher.clone(),
    ));
    let register_usecase = Arc::new(RegisterUseCase::new(
        sessions.clone(),
        typing.clone(),
        message_pusher.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        history.clone(),
        message_pusher.clone(),
        store.clone(),
    ));
    let typing_usecase = Arc::new(TypingUseCase::new(typing.clone(), message_pusher.clone()));
    let seen_usecase = Arc::new(SeenUseCase::new(message_pusher.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        sessions.clone(),
        typing.clone(),
        last_seen.clone(),
        message_pusher.clone(),
    ));

    // 5. Create and run the server
    let allowed_origin = std::env::var("ALLOWED_ORIGIN")
        .ok()
        .filter(|v| !v.is_empty());
    let server = Server::new(
        connect_usecase,
        register_usecase,
        send_message_usecase,
        typing_usecase,
        seen_usecase,
        disconnect_usecase,
    );
    if let Err(e) = server.run(args.host, args.port, allowed_origin).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
