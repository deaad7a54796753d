//! Client error types

use thiserror::Error;

/// Faults that propagate out of client calls
///
/// Protocol-level negative outcomes (timeout, reject, malformed responses)
/// are NOT errors; they come back inside
/// [`AuthResult`](crate::result::AuthResult). This enum covers invalid
/// configuration and transport failures only.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error during socket operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RADIUS packet encoding/decoding error
    #[error("Packet error: {0}")]
    Packet(#[from] radius_proto::PacketError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
