//! Matchmaking and round lifecycle for Clash.
//!
//! A single engine task owns all mutable game state: the waiting slot and
//! every open round. Connection handlers talk to it through an
//! [`EngineHandle`]; round deadlines are posted back to it by per-round
//! timers.
//!
//! # Key types
//!
//! - [`MatchEngine`]: synchronous state machine (join, move, deadline, disconnect)
//! - [`EngineHandle`]: send commands to the running engine actor
//! - [`Round`]: two seated participants, their moves and a deadline
//! - [`RoundRegistry`]: open rounds, indexed by id and by player
//! - [`resolve`]: who won a pair of moves
//!
//! # Lifecycle
//!
//! ```text
//! join ──→ waiting slot ──join──→ Round(Open) ──2nd move | deadline──→ Resolved
//!                                     │                                   │
//!                                     └─ start to both                    └─ result to both
//! ```

mod actor;
mod config;
mod engine;
mod error;
mod matchmaker;
mod outcome;
mod registry;
mod round;

pub use actor::{EngineHandle, spawn_engine};
pub use config::{RoundConfig, RoundState};
pub use engine::{EngineInfo, JoinOutcome, MatchEngine, SubmitOutcome};
pub use error::RoundError;
pub use matchmaker::{Matchmaker, Pairing};
pub use outcome::{Winner, resolve};
pub use registry::RoundRegistry;
pub use round::{Resolution, Round};
