//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use mitsumori_shared::time::{Clock, SystemClock};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, DispatchCommandUseCase,
        EvictIdleRoomsUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
    },
};

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Planning poker server
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::default();
/// Server::from_config(&config).run(&config.bind_addr()).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    /// EvictIdleRoomsUseCase（空きルーム削除のユースケース）
    evict_idle_rooms_usecase: Arc<EvictIdleRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance from already wired use cases
    pub fn new(
        app_state: AppState,
        evict_idle_rooms_usecase: Arc<EvictIdleRoomsUseCase>,
    ) -> Self {
        Self {
            app_state: Arc::new(app_state),
            evict_idle_rooms_usecase,
        }
    }

    /// Wire the in-memory repository, the WebSocket pusher and the use cases
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_pusher(config, Arc::new(WebSocketMessagePusher::new()))
    }

    fn with_pusher(config: &ServerConfig, message_pusher: Arc<WebSocketMessagePusher>) -> Self {
        // 1. Repository
        let repository = Arc::new(InMemoryRoomRepository::new(config.policy.clone()));

        // 2. UseCases
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let dispatch_command_usecase = DispatchCommandUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            clock.clone(),
            config.strict_mode,
        );
        let app_state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                message_pusher,
                dispatch_command_usecase.clone(),
            )),
            dispatch_command_usecase: Arc::new(dispatch_command_usecase),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository.clone())),
        };
        let evict_idle_rooms_usecase = Arc::new(EvictIdleRoomsUseCase::new(
            repository,
            clock,
            config.room_idle,
        ));

        Self::new(app_state, evict_idle_rooms_usecase)
    }

    /// Build the router without binding
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the server
    ///
    /// # Arguments
    ///
    /// * `bind_addr` - The address to bind to (e.g., "127.0.0.1:8080")
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();
        let local_addr = listener.local_addr()?;

        tracing::info!("Planning poker server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws?room=<room>", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let sweeper = spawn_room_sweeper(self.evict_idle_rooms_usecase.clone());

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;
        sweeper.abort();
        result?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Periodically removes rooms that stayed empty longer than the grace period.
fn spawn_room_sweeper(usecase: Arc<EvictIdleRoomsUseCase>) -> tokio::task::JoinHandle<()> {
    let period = (usecase.grace() / 2).clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = usecase.execute().await;
            if !evicted.is_empty() {
                tracing::debug!("Swept {} idle room(s)", evicted.len());
            }
        }
    })
}
