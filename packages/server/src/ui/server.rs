//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::MessagePusher,
    usecase::{
        ConnectUserUseCase, DisconnectUserUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        SendMessageUseCase,
    },
};

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Error returned when the server fails to bind or serve.
pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     config,
///     connect_user_usecase,
///     join_room_usecase,
///     leave_room_usecase,
///     send_message_usecase,
///     disconnect_user_usecase,
///     message_pusher,
/// );
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    app_state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address and per-connection limits
    /// * `connect_user_usecase` - UseCase for authentication and registration
    /// * `join_room_usecase` - UseCase for joining rooms
    /// * `leave_room_usecase` - UseCase for leaving rooms
    /// * `send_message_usecase` - UseCase for relaying messages
    /// * `disconnect_user_usecase` - UseCase for teardown
    /// * `message_pusher` - Outbound queues, used to report errors to the originating connection
    pub fn new(
        config: ServerConfig,
        connect_user_usecase: Arc<ConnectUserUseCase>,
        join_room_usecase: Arc<JoinRoomUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_user_usecase: Arc<DisconnectUserUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        let app_state = Arc::new(AppState {
            connect_user_usecase,
            join_room_usecase,
            leave_room_usecase,
            send_message_usecase,
            disconnect_user_usecase,
            message_pusher,
            outbound_capacity: config.outbound_capacity(),
        });
        Self { config, app_state }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the relay server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?token=<jwt>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
