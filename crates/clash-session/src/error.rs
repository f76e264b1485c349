//! Error types for the session layer.

use clash_protocol::PlayerId;

/// Errors that can occur while registering or removing participants.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given participant.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The participant already has a registered session.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),
}
