//! Server execution logic.

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::{
    ConnectUseCase, DisconnectUseCase, RegisterUseCase, SeenUseCase, SendMessageUseCase,
    TypingUseCase,
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket relay server
///
/// This struct encapsulates the wired usecases and provides a method to run
/// the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_usecase,
///     register_usecase,
///     send_message_usecase,
///     typing_usecase,
///     seen_usecase,
///     disconnect_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080, None).await?;
/// ```
pub struct Server {
    /// ConnectUseCase（接続受付のユースケース）
    connect_usecase: Arc<ConnectUseCase>,
    /// RegisterUseCase（表示名登録のユースケース）
    register_usecase: Arc<RegisterUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// TypingUseCase（タイピング状態更新のユースケース）
    typing_usecase: Arc<TypingUseCase>,
    /// SeenUseCase（既読通知のユースケース）
    seen_usecase: Arc<SeenUseCase>,
    /// DisconnectUseCase（接続切断のユースケース）
    disconnect_usecase: Arc<DisconnectUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_usecase: Arc<ConnectUseCase>,
        register_usecase: Arc<RegisterUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        typing_usecase: Arc<TypingUseCase>,
        seen_usecase: Arc<SeenUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
    ) -> Self {
        Self {
            connect_usecase,
            register_usecase,
            send_message_usecase,
            typing_usecase,
            seen_usecase,
            disconnect_usecase,
        }
    }

    /// Run the WebSocket relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    /// * `allowed_origin` - Cross-origin caller allowed by CORS; permissive
    ///   when not configured
    ///
    /// # Errors
    ///
    /// Returns an error if the configured origin is not a valid header
    /// value, if the server fails to bind, or if serving fails.
    pub async fn run(
        self,
        host: String,
        port: u16,
        allowed_origin: Option<String>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_usecase: self.connect_usecase,
            register_usecase: self.register_usecase,
            send_message_usecase: self.send_message_usecase,
            typing_usecase: self.typing_usecase,
            seen_usecase: self.seen_usecase,
            disconnect_usecase: self.disconnect_usecase,
        });

        let cors = match allowed_origin {
            Some(origin) => {
                tracing::info!("Allowing cross-origin requests from {}", origin);
                CorsLayer::new().allow_origin(origin.parse::<HeaderValue>()?)
            }
            None => CorsLayer::permissive(),
        };

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("kotatsu relay listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
