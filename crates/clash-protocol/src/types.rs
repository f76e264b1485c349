//! Core protocol types for Clash's wire format.
//!
//! Every frame is a JSON object `{ "type": string, "payload": ... }`.
//! Inbound frames are parsed leniently into an [`Envelope`] first and then
//! classified into a [`ClientMessage`], so that unknown `type` values can be
//! told apart from malformed frames. Outbound frames are the strongly typed
//! [`ServerMessage`] enum.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identity of one connected participant.
///
/// Newtype over `u64` so it can't be mixed up with a [`RoundId`].
/// Serialized transparently as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identity of one round. Never reused by the engine that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(pub u64);

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game vocabulary
// ---------------------------------------------------------------------------

/// A submitted move.
///
/// Clients may send any string; anything other than the three standard
/// moves is kept verbatim in [`Choice::Other`] rather than rejected.
/// On the wire a choice is always a plain string (`"rock"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
    /// A move outside the standard set, as the client sent it.
    Other(String),
}

impl Choice {
    /// The fixed move set. Random synthesis only ever draws from here.
    pub const STANDARD: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// The wire spelling of this move.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
            Self::Other(s) => s,
        }
    }

    /// `true` for rock, paper and scissors.
    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Choice {
    fn from(s: String) -> Self {
        match s.as_str() {
            "rock" => Self::Rock,
            "paper" => Self::Paper,
            "scissors" => Self::Scissors,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Choice {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Choice> for String {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Other(s) => s,
            standard => standard.as_str().to_string(),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seat of a participant inside a round. The first joiner is `Player1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player1,
    Player2,
}

impl Role {
    /// Index of this seat in a `[player1, player2]` pair.
    pub fn index(self) -> usize {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }

    /// The other seat.
    pub fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player1 => f.write_str("player1"),
            Self::Player2 => f.write_str("player2"),
        }
    }
}

/// A round's result from one participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// The raw inbound frame: a `type` tag plus an untyped payload.
///
/// `payload` defaults to `null` when absent (a bare `{"type":"join"}` is
/// valid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

/// A recognised client request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Relay this payload verbatim to every open connection.
    Chat(serde_json::Value),
    /// Ask the matchmaker for an opponent.
    Join,
    /// Submit a move for the sender's current round.
    Move(Choice),
}

impl ClientMessage {
    /// Classifies an envelope.
    ///
    /// Returns `Ok(None)` for an unknown `type` (callers ignore those).
    ///
    /// # Errors
    /// [`ProtocolError::InvalidMessage`] when a known `type` carries a
    /// payload of the wrong shape.
    pub fn from_envelope(envelope: Envelope) -> Result<Option<Self>, ProtocolError> {
        match envelope.kind.as_str() {
            "chat" => Ok(Some(Self::Chat(envelope.payload))),
            "join" => Ok(Some(Self::Join)),
            "move" => match envelope.payload {
                serde_json::Value::String(s) => Ok(Some(Self::Move(Choice::from(s)))),
                other => Err(ProtocolError::InvalidMessage(format!(
                    "move payload must be a string, got {other}"
                ))),
            },
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Payload of a `start` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPayload {
    pub player: Role,
    /// Round deadline in whole seconds.
    pub countdown: u64,
}

/// Payload of a `result` message, addressed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub your_move: Choice,
    pub opponent_move: Choice,
    pub outcome: Outcome,
}

/// Everything the server sends.
///
/// Adjacently tagged, so `Status("x")` becomes
/// `{"type":"status","payload":"x"}`. A chat relay whose payload is `null`
/// omits the `payload` key, mirroring a sender that left it out.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum ServerMessage {
    Status(String),
    Start(StartPayload),
    Result(ResultPayload),
    Chat(serde_json::Value),
}

impl ServerMessage {
    /// The wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status(_) => "status",
            Self::Start(_) => "start",
            Self::Result(_) => "result",
            Self::Chat(_) => "chat",
        }
    }
}

impl Serialize for ServerMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind())?;
        match self {
            Self::Status(text) => map.serialize_entry("payload", text)?,
            Self::Start(start) => map.serialize_entry("payload", start)?,
            Self::Result(result) => map.serialize_entry("payload", result)?,
            Self::Chat(serde_json::Value::Null) => {}
            Self::Chat(payload) => map.serialize_entry("payload", payload)?,
        }
        map.end()
    }
}

// =========================================================================
// Tests
// =========================================================================
