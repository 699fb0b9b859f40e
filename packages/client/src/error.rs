//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server refused the room id
    #[error("Room '{0}' is not a valid room id")]
    InvalidRoom(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The typed line is not a command
    #[error("{0}")]
    InvalidCommand(String),
}
