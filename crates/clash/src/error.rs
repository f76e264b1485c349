//! Unified error type for the Clash server.

use clash_protocol::ProtocolError;
use clash_round::RoundError;
use clash_session::SessionError;
use clash_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ClashError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (duplicate or unknown participant).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A round-level error (engine unavailable, move outside a round).
    #[error(transparent)]
    Round(#[from] RoundError),

    /// An invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use clash_protocol::PlayerId;

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::other("gone"));
        let clash_err: ClashError = err.into();
        assert!(matches!(clash_err, ClashError::Transport(_)));
        assert!(clash_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let clash_err: ClashError = err.into();
        assert!(matches!(clash_err, ClashError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AlreadyConnected(PlayerId(1));
        let clash_err: ClashError = err.into();
        assert!(matches!(clash_err, ClashError::Session(_)));
    }

    #[test]
    fn test_from_round_error() {
        let clash_err: ClashError = RoundError::Unavailable.into();
        assert!(matches!(clash_err, ClashError::Round(_)));
    }

    #[test]
    fn test_config_error_message() {
        let err = ClashError::Config("PORT must be a number".into());
        assert_eq!(err.to_string(), "invalid configuration: PORT must be a number");
    }
}
