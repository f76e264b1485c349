//! The waiting slot: pairs join requests two at a time.

use clash_protocol::PlayerId;
use clash_session::Participant;

/// What a join request did to the waiting slot.
#[derive(Debug)]
pub enum Pairing {
    /// The slot was empty (or held a closed connection); the requester now waits.
    Queued,
    /// The requester is already the one waiting; nothing changed.
    AlreadyWaiting,
    /// The waiting participant was taken. `player1` is the earlier joiner.
    Paired {
        player1: Participant,
        player2: Participant,
    },
}

/// Holds at most one participant waiting for an opponent.
#[derive(Debug, Default)]
pub struct Matchmaker {
    waiting: Option<Participant>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles a join request.
    ///
    /// A waiting participant whose connection has closed is discarded rather
    /// than paired, so a live requester never lands in a round with nobody.
    pub fn request_join(&mut self, participant: Participant) -> Pairing {
        match self.waiting.take() {
            Some(waiting) if waiting.id() == participant.id() => {
                self.waiting = Some(waiting);
                Pairing::AlreadyWaiting
            }
            Some(waiting) if waiting.is_open() => Pairing::Paired {
                player1: waiting,
                player2: participant,
            },
            stale => {
                if let Some(stale) = stale {
                    tracing::debug!(player_id = %stale.id(), "dropping closed waiting participant");
                }
                self.waiting = Some(participant);
                Pairing::Queued
            }
        }
    }

    /// Clears the slot if `player_id` holds it. Returns whether it did.
    pub fn remove_if_waiting(&mut self, player_id: PlayerId) -> bool {
        if self.waiting.as_ref().is_some_and(|w| w.id() == player_id) {
            self.waiting = None;
            true
        } else {
            false
        }
    }

    /// The participant currently waiting, if any.
    pub fn waiting(&self) -> Option<&Participant> {
        self.waiting.as_ref()
    }
}
