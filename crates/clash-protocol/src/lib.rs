//! Wire protocol for Clash.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`Envelope`], [`ClientMessage`], [`ServerMessage`],
//!   [`Choice`], etc.): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the match
//! engine. It knows nothing about connections or rounds.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope → ClientMessage) → Engine
//! ```
//!
//! Every frame in either direction is `{ "type": ..., "payload": ... }`.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Choice, ClientMessage, Envelope, Outcome, PlayerId, ResultPayload, Role,
    RoundId, ServerMessage, StartPayload,
};
