//! Error types for the round layer.
//!
//! Most of these describe inputs the engine deliberately ignores (a late
//! duplicate move, a move from someone not in a round). They are returned
//! so callers and tests can see *why* nothing happened; they are never
//! forwarded to the client.

use clash_protocol::{PlayerId, RoundId};

/// Errors that can occur during matchmaking and round operations.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    /// The round does not exist (never created, or already resolved).
    #[error("round {0} not found")]
    NotFound(RoundId),

    /// The participant is not in any round.
    #[error("player {0} is not in a round")]
    NotInRound(PlayerId),

    /// The participant is not one of this round's two players.
    #[error("player {0} is not a player in round {1}")]
    NotAPlayer(PlayerId, RoundId),

    /// The participant already has a recorded move in this round.
    #[error("player {0} already moved in round {1}")]
    AlreadySubmitted(PlayerId, RoundId),

    /// The round is in a state that doesn't allow this operation.
    #[error("invalid round state for this operation: {0}")]
    InvalidState(String),

    /// The engine's command channel is full or closed.
    #[error("match engine is unavailable")]
    Unavailable,
}
