//! # Clash
//!
//! Real-time rock/paper/scissors over WebSocket.
//!
//! Clients connect, send `join` to be paired with the next waiting
//! opponent, and have a fixed window to send a `move`. When both moves are
//! in, or the window closes, each side gets its result. A silent player's
//! move is drawn at random. Any connected client can also `chat`; chat is
//! relayed to every open connection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clash::prelude::*;
//!
//! # async fn start() -> Result<(), ClashError> {
//! let server = ClashServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::ClashError;
pub use server::{ClashServer, ClashServerBuilder};

/// Convenient re-exports for server binaries and tests.
pub mod prelude {
    pub use crate::{ClashError, ClashServer, ClashServerBuilder, ServerConfig};
    pub use clash_protocol::{
        Choice, Codec, Envelope, JsonCodec, Outcome, PlayerId, ResultPayload, Role, RoundId,
        ServerMessage, StartPayload,
    };
    pub use clash_round::{EngineHandle, EngineInfo, JoinOutcome, RoundConfig};
}
