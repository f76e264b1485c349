//! The session manager: every currently connected participant.
//!
//! Responsibilities:
//! - Registering a participant when its connection is accepted
//! - Removing it when the connection closes
//! - Chat fan-out: delivering a message to every open connection
//!
//! # Concurrency note
//!
//! `SessionManager` is a plain `HashMap` and is not thread-safe by itself.
//! The server wraps it in a `tokio::sync::Mutex`; keeping it lock-free here
//! avoids hidden locking overhead.

use std::collections::HashMap;
use std::time::Instant;

use clash_protocol::{PlayerId, ServerMessage};

use crate::{Participant, Session, SessionError};

/// Registry of connected participants.
///
/// ```text
/// accept ──→ create() ──→ broadcast()* ──→ disconnect()
/// ```
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Registers a newly connected participant.
    ///
    /// # Errors
    /// [`SessionError::AlreadyConnected`] if the id is already registered
    /// with an open connection. A stale entry whose connection has closed
    /// is replaced.
    pub fn create(&mut self, participant: Participant) -> Result<&Session, SessionError> {
        let player_id = participant.id();
        if let Some(existing) = self.sessions.get(&player_id) {
            if existing.participant.is_open() {
                return Err(SessionError::AlreadyConnected(player_id));
            }
        }

        self.sessions.insert(
            player_id,
            Session {
                participant,
                connected_at: Instant::now(),
            },
        );
        tracing::debug!(%player_id, sessions = self.sessions.len(), "session created");

        self.sessions
            .get(&player_id)
            .ok_or(SessionError::NotFound(player_id))
    }

    /// Removes a participant whose connection closed.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::debug!(
            %player_id,
            connected_ms = session.connected_for().as_millis() as u64,
            "session removed"
        );
        Ok(session)
    }

    /// Delivers `msg` to every open connection, sender included.
    ///
    /// Best effort: closed connections are skipped. Returns how many
    /// participants the message was queued for.
    pub fn broadcast(&self, msg: &ServerMessage) -> usize {
        let delivered = self
            .sessions
            .values()
            .filter(|session| session.participant.send(msg.clone()))
            .count();
        tracing::trace!(delivered, "broadcast");
        delivered
    }

    /// Looks up a session by participant id.
    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` if no one is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
