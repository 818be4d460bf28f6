//! Hiroba relay server.
//!
//! Authenticated WebSocket clients join rooms and exchange messages; each
//! message is persisted before it is broadcast to the room.
//!
//! Run with:
//! ```not_rust
//! HIROBA_JWT_SECRET=change-me cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --jwt-secret change-me
//! ```

use std::sync::Arc;

use clap::{Parser, builder::TypedValueParser};
use hiroba_server::{
    config::{DEFAULT_OUTBOUND_CAPACITY, ServerConfig},
    infrastructure::{
        auth::JwtTokenVerifier, message_pusher::WebSocketMessagePusher,
        registry::InMemoryConnectionRegistry, store::InMemoryMessageStore,
    },
    ui::Server,
    usecase::{
        ConnectUserUseCase, DisconnectUserUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        SendMessageUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket room broadcast relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Shared secret used to verify HS256 bearer tokens
    #[arg(long, env = "HIROBA_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Reject tokens that carry no `exp` claim
    #[arg(long, env = "HIROBA_REQUIRE_TOKEN_EXPIRY")]
    require_token_expiry: bool,

    /// Capacity of each connection's outbound queue
    #[arg(
        long,
        env = "HIROBA_OUTBOUND_CAPACITY",
        default_value_t = DEFAULT_OUTBOUND_CAPACITY,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    outbound_capacity: usize,

    /// Maximum number of rooms a single connection may join (unlimited if omitted)
    #[arg(long, env = "HIROBA_MAX_ROOMS_PER_CONNECTION")]
    max_rooms_per_connection: Option<usize>,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        outbound_capacity: args.outbound_capacity,
        max_rooms_per_connection: args.max_rooms_per_connection,
    };

    // Initialize dependencies in order:
    // 1. Ports (verifier, registry, store, pusher)
    // 2. UseCases
    // 3. Server

    // 1. Create ports
    let verifier = Arc::new(
        JwtTokenVerifier::new(args.jwt_secret.as_bytes())
            .require_expiry(args.require_token_expiry),
    );
    let registry = Arc::new(InMemoryConnectionRegistry::with_room_limit(
        config.max_rooms_per_connection,
    ));
    let store = Arc::new(InMemoryMessageStore::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. Create UseCases
    let connect_user_usecase = Arc::new(ConnectUserUseCase::new(
        verifier,
        registry.clone(),
        message_pusher.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(registry.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        store,
        registry.clone(),
        message_pusher.clone(),
        Arc::new(SystemClock),
    ));
    let disconnect_user_usecase = Arc::new(DisconnectUserUseCase::new(
        registry,
        message_pusher.clone(),
    ));

    // 3. Create and run the server
    let server = Server::new(
        config,
        connect_user_usecase,
        join_room_usecase,
        leave_room_usecase,
        send_message_usecase,
        disconnect_user_usecase,
        message_pusher,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
