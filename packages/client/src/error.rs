//! Error types for the kotatsu CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection error (handshake failure or lost connection)
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
