//! Server execution logic.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::infrastructure::retry::{ConnectivityState, with_retries};

use super::{
    handler::{
        http::{
            accept_connection, add_reaction, create_connection, delete_message, delete_room,
            get_profile, get_profiles, get_room_detail, get_rooms, health_check, heartbeat,
            leave_room, list_accepted_connections, list_active_presence,
            list_incoming_connections, list_messages, list_sent_connections, reject_connection,
            remove_reaction, resolve_room, send_message, sweep_expired, upsert_profile,
        },
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Ephemeral chat server
///
/// Owns the shared [`AppState`], the connectivity observer injected into the
/// periodic sweep, and the sweep cadence.
pub struct Server {
    state: Arc<AppState>,
    connectivity: ConnectivityState,
    sweep_interval: Duration,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `state` - Shared application state (use cases and pusher)
    /// * `connectivity` - Connectivity observer consulted by the sweep loop
    /// * `sweep_interval` - Cadence of the in-process expiry sweep
    pub fn new(
        state: Arc<AppState>,
        connectivity: ConnectivityState,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            state,
            connectivity,
            sweep_interval,
        }
    }

    /// Run the chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // 外部のジョブランナーが繋がっていなくても掃除が回るよう、
        // プロセス内のスイープループを持つ（エンドポイント経由の手動実行と併存）
        let sweep_task = {
            let state = self.state.clone();
            let connectivity = self.connectivity.clone();
            let interval = self.sweep_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                // 起動直後の即時実行はスキップ
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let usecase = state.sweep_expired_usecase.clone();
                    let result = with_retries(&connectivity, "sweep expired messages", || {
                        let usecase = usecase.clone();
                        async move { usecase.execute().await }
                    })
                    .await;
                    if let Err(e) = result {
                        tracing::error!("Periodic sweep failed after retries: {}", e);
                    }
                }
            })
        };

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント（ライブ購読）
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", post(resolve_room).get(get_rooms))
            .route(
                "/api/rooms/{room_id}",
                get(get_room_detail).delete(delete_room),
            )
            .route(
                "/api/rooms/{room_id}/messages",
                get(list_messages).post(send_message),
            )
            .route("/api/messages/{message_id}", delete(delete_message))
            .route(
                "/api/messages/{message_id}/reactions",
                post(add_reaction).delete(remove_reaction),
            )
            .route(
                "/api/rooms/{room_id}/presence",
                get(list_active_presence).post(heartbeat),
            )
            .route(
                "/api/rooms/{room_id}/presence/{user_id}",
                delete(leave_room),
            )
            .route("/api/connections", post(create_connection))
            .route("/api/connections/{request_id}/accept", post(accept_connection))
            .route("/api/connections/{request_id}/reject", post(reject_connection))
            .route(
                "/api/connections/incoming/{user_id}",
                get(list_incoming_connections),
            )
            .route("/api/connections/sent/{user_id}", get(list_sent_connections))
            .route(
                "/api/connections/accepted/{user_id}",
                get(list_accepted_connections),
            )
            .route(
                "/api/profiles/{user_id}",
                get(get_profile).put(upsert_profile),
            )
            .route("/api/profiles/batch", post(get_profiles))
            // 外部のスケジュールジョブランナー向けの掃除トリガー
            .route("/api/maintenance/sweep", post(sweep_expired))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Utakata chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweep_task.abort();
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
