//! Server configuration.

use std::time::Duration;

use crate::domain::RoomPolicy;

/// Default grace period before an empty room is evicted.
pub const DEFAULT_ROOM_IDLE: Duration = Duration::from_secs(300);

/// Runtime configuration assembled by the server binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Applied to every room created by this server
    pub policy: RoomPolicy,
    /// Push a `rejected` event to the sender instead of dropping silently
    pub strict_mode: bool,
    /// How long a room may stay empty before it is removed
    pub room_idle: Duration,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            policy: RoomPolicy::default(),
            strict_mode: false,
            room_idle: DEFAULT_ROOM_IDLE,
        }
    }
}
