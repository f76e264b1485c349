//! Session types: the connection handle and the server's record of it.
//!
//! A [`Participant`] is what the rest of the server holds on to when it
//! needs to talk to a connected player: an identity plus an outbound queue.
//! The queue's receiving end belongs to the connection's handler task,
//! which writes every queued message to the socket. Once that task ends the
//! receiver is dropped and the participant reports itself closed.

use std::time::{Duration, Instant};

use clash_protocol::{PlayerId, ServerMessage};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// One connected participant: identity plus connection handle.
///
/// Cheap to clone; every clone addresses the same connection.
#[derive(Debug, Clone)]
pub struct Participant {
    id: PlayerId,
    outbound: mpsc::UnboundedSender<ServerMessage>,
}

impl Participant {
    /// Wraps an existing outbound queue.
    pub fn new(id: PlayerId, outbound: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { id, outbound }
    }

    /// Creates a participant together with the receiving end of its queue.
    pub fn channel(id: PlayerId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(id, tx), rx)
    }

    /// The participant's identity.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// `false` once the connection handler has gone away.
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Queues a message for delivery.
    ///
    /// Never blocks and never fails loudly: a closed connection is skipped
    /// and reported as `false`.
    pub fn send(&self, msg: ServerMessage) -> bool {
        if !self.is_open() {
            tracing::trace!(player_id = %self.id, "skipping send to closed connection");
            return false;
        }
        self.outbound.send(msg).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The server's record of one connected participant.
#[derive(Debug, Clone)]
pub struct Session {
    /// Connection handle for this participant.
    pub participant: Participant,

    /// When the connection was registered.
    pub connected_at: Instant,
}

impl Session {
    /// How long this participant has been connected.
    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
