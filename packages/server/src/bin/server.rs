//! Ephemeral chat-room server with TTL messages and heartbeat presence.
//!
//! Rooms are resolved by topic slug (optionally password-gated), messages
//! expire per their delete mode, and a periodic sweep reclaims expired rows.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin utakata-server
//! cargo run --bin utakata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use utakata_server::{
    domain::MessagePusher,
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        password::Argon2PasswordHasher,
        repository::{
            InMemoryConnectionRepository, InMemoryMessageRepository, InMemoryPresenceRepository,
            InMemoryProfileRepository, InMemoryRoomRepository,
        },
        retry::ConnectivityState,
    },
    ui::{AppState, Server},
    usecase::{
        DeleteMessageUseCase, DeleteRoomUseCase, GetProfileUseCase, HandshakePolicy,
        HeartbeatUseCase, LeaveRoomUseCase, ListActivePresenceUseCase, ListConnectionsUseCase,
        ListMessagesUseCase, ListRoomsUseCase, ReactMessageUseCase, RequestConnectionUseCase,
        ResolveConnectionUseCase, ResolveRoomUseCase, SendMessageUseCase, SweepExpiredUseCase,
        UpsertProfileUseCase,
    },
};
use utakata_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "utakata-server")]
#[command(about = "Ephemeral chat-room server with TTL messages and presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Seconds between periodic expired-message sweeps
    #[arg(long, default_value_t = 7200)]
    sweep_interval_secs: u64,

    /// Allow duplicate pending connection requests between the same pair
    #[arg(long, default_value_t = false)]
    allow_duplicate_pending: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. PasswordHasher / MessagePusher / Clock / Connectivity
    // 3. UseCases
    // 4. AppState
    // 5. Server

    // 1. Create Repositories (in-memory database)
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let message_repository = Arc::new(InMemoryMessageRepository::new());
    let presence_repository = Arc::new(InMemoryPresenceRepository::new());
    let connection_repository = Arc::new(InMemoryConnectionRepository::new());
    let profile_repository = Arc::new(InMemoryProfileRepository::new());

    // 2. Create collaborators
    let password_hasher = Arc::new(Argon2PasswordHasher::new());
    let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let connectivity = ConnectivityState::new_online();

    // 3. Create UseCases
    let resolve_room_usecase = Arc::new(ResolveRoomUseCase::new(
        room_repository.clone(),
        password_hasher.clone(),
        clock.clone(),
    ));
    let delete_room_usecase = Arc::new(DeleteRoomUseCase::new(room_repository.clone()));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(room_repository.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        message_repository.clone(),
        presence_repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let list_messages_usecase = Arc::new(ListMessagesUseCase::new(
        message_repository.clone(),
        clock.clone(),
    ));
    let react_message_usecase = Arc::new(ReactMessageUseCase::new(message_repository.clone()));
    let delete_message_usecase = Arc::new(DeleteMessageUseCase::new(message_repository.clone()));
    let sweep_expired_usecase = Arc::new(SweepExpiredUseCase::new(
        message_repository.clone(),
        clock.clone(),
    ));
    let heartbeat_usecase = Arc::new(HeartbeatUseCase::new(
        presence_repository.clone(),
        clock.clone(),
    ));
    let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(presence_repository.clone()));
    let list_active_presence_usecase = Arc::new(ListActivePresenceUseCase::new(
        presence_repository.clone(),
        clock.clone(),
    ));
    let request_connection_usecase = Arc::new(RequestConnectionUseCase::new(
        connection_repository.clone(),
        clock.clone(),
        HandshakePolicy {
            allow_duplicate_pending: args.allow_duplicate_pending,
        },
    ));
    let resolve_connection_usecase = Arc::new(ResolveConnectionUseCase::new(
        connection_repository.clone(),
        room_repository.clone(),
        clock.clone(),
    ));
    let list_connections_usecase =
        Arc::new(ListConnectionsUseCase::new(connection_repository.clone()));
    let get_profile_usecase = Arc::new(GetProfileUseCase::new(profile_repository.clone()));
    let upsert_profile_usecase = Arc::new(UpsertProfileUseCase::new(
        profile_repository.clone(),
        clock.clone(),
    ));

    // 4. Create AppState
    let state = Arc::new(AppState {
        resolve_room_usecase,
        delete_room_usecase,
        list_rooms_usecase,
        send_message_usecase,
        list_messages_usecase,
        react_message_usecase,
        delete_message_usecase,
        sweep_expired_usecase,
        heartbeat_usecase,
        leave_room_usecase,
        list_active_presence_usecase,
        request_connection_usecase,
        resolve_connection_usecase,
        list_connections_usecase,
        get_profile_usecase,
        upsert_profile_usecase,
        message_pusher,
        clock,
    });

    // 5. Create and run the server
    let server = Server::new(
        state,
        connectivity,
        Duration::from_secs(args.sweep_interval_secs),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
