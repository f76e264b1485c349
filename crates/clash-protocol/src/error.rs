//! Error types for the protocol layer.
//!
//! Each crate in Clash defines its own error enum, so a `ProtocolError`
//! always means a serialization or message-shape problem, never a network
//! or matchmaking one.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing `type`, or a field
    /// of the wrong shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The envelope parsed but its payload does not fit its `type`,
    /// e.g. a `move` whose payload is not a string.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
