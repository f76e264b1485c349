//! Connected participants for Clash.
//!
//! This crate owns the notion of "someone on the other end of a socket":
//!
//! 1. **Connection handle**: [`Participant`], an identity plus an outbound
//!    message queue that never blocks and silently skips closed connections
//! 2. **Registry**: [`SessionManager`], everyone currently connected, and
//!    the chat fan-out over them
//!
//! # How it fits in the stack
//!
//! ```text
//! Round Layer (above)  ← holds Participants in the waiting slot and in rounds
//!     ↕
//! Session Layer (this crate)  ← connection handles + who is online
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, ServerMessage
//! ```

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Participant, Session};
