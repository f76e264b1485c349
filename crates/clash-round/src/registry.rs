//! Open rounds, indexed by round id and by player.

use std::collections::HashMap;

use clash_protocol::{PlayerId, RoundId};

use crate::Round;

/// Every round that has not been resolved yet.
///
/// A player is in at most one open round at a time; `player_rounds` is kept
/// in lockstep with `rounds` so move routing is a single lookup.
#[derive(Debug, Default)]
pub struct RoundRegistry {
    rounds: HashMap<RoundId, Round>,
    player_rounds: HashMap<PlayerId, RoundId>,
}

impl RoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a round and indexes both of its players.
    pub fn insert(&mut self, round: Round) {
        let round_id = round.id();
        for player in round.players() {
            self.player_rounds.insert(player.id(), round_id);
        }
        self.rounds.insert(round_id, round);
    }

    pub fn get(&self, round_id: RoundId) -> Option<&Round> {
        self.rounds.get(&round_id)
    }

    pub fn get_mut(&mut self, round_id: RoundId) -> Option<&mut Round> {
        self.rounds.get_mut(&round_id)
    }

    /// The open round `player_id` is seated in.
    pub fn round_for(&self, player_id: &PlayerId) -> Option<RoundId> {
        self.player_rounds.get(player_id).copied()
    }

    /// Takes a round out of the registry and un-indexes its players.
    pub fn remove(&mut self, round_id: RoundId) -> Option<Round> {
        let round = self.rounds.remove(&round_id)?;
        for player in round.players() {
            if self.player_rounds.get(&player.id()) == Some(&round_id) {
                self.player_rounds.remove(&player.id());
            }
        }
        Some(round)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }
}
