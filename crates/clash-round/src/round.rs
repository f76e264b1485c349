//! A single round: two seated participants, their moves, and a deadline.

use std::collections::HashMap;
use std::time::Duration;

use clash_protocol::{Choice, PlayerId, ResultPayload, Role, RoundId, ServerMessage};
use clash_session::Participant;
use clash_timer::DeadlineTimer;
use rand::Rng;
use tokio::time::Instant;

use crate::outcome::{self, Winner};
use crate::{RoundError, RoundState};

/// One match between exactly two participants.
///
/// Seat order is fixed at creation: `players[0]` is player1 (the one who
/// was waiting), `players[1]` is player2. At most one move is recorded per
/// player, and only while the round is [`RoundState::Open`].
#[derive(Debug)]
pub struct Round {
    id: RoundId,
    players: [Participant; 2],
    choices: HashMap<PlayerId, Choice>,
    timer: DeadlineTimer,
    state: RoundState,
    created_at: Instant,
}

impl Round {
    pub fn new(
        id: RoundId,
        player1: Participant,
        player2: Participant,
        timer: DeadlineTimer,
    ) -> Self {
        Self {
            id,
            players: [player1, player2],
            choices: HashMap::with_capacity(2),
            timer,
            state: RoundState::Open,
            created_at: Instant::now(),
        }
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn players(&self) -> &[Participant; 2] {
        &self.players
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// The seat `player_id` occupies, if they are in this round.
    pub fn role_of(&self, player_id: PlayerId) -> Option<Role> {
        if self.players[0].id() == player_id {
            Some(Role::Player1)
        } else if self.players[1].id() == player_id {
            Some(Role::Player2)
        } else {
            None
        }
    }

    pub fn choice_of(&self, player_id: PlayerId) -> Option<&Choice> {
        self.choices.get(&player_id)
    }

    /// Number of moves recorded so far (0, 1 or 2).
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    pub fn timer(&self) -> &DeadlineTimer {
        &self.timer
    }

    /// Time since the round was created, on the Tokio clock.
    pub fn open_for(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Records a move. Returns `true` once both players have moved.
    ///
    /// # Errors
    /// - [`RoundError::InvalidState`] if the round is already resolved
    /// - [`RoundError::NotAPlayer`] if `player_id` has no seat here
    /// - [`RoundError::AlreadySubmitted`] on a second move from the same
    ///   player; the first move stands
    pub fn submit(&mut self, player_id: PlayerId, choice: Choice) -> Result<bool, RoundError> {
        if !self.state.is_open() {
            return Err(RoundError::InvalidState(format!(
                "round {} is {}",
                self.id, self.state
            )));
        }
        if self.role_of(player_id).is_none() {
            return Err(RoundError::NotAPlayer(player_id, self.id));
        }
        if self.choices.contains_key(&player_id) {
            return Err(RoundError::AlreadySubmitted(player_id, self.id));
        }

        self.choices.insert(player_id, choice);
        Ok(self.choices.len() == 2)
    }

    /// Closes the round and decides it.
    ///
    /// Any player without a move gets one drawn uniformly from the standard
    /// set. The deadline timer is cancelled. Returns `None` if the round
    /// was already resolved, so a round is never decided twice.
    pub fn resolve<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Resolution> {
        if !self.state.is_open() {
            return None;
        }
        self.state = RoundState::Resolved;
        self.timer.cancel();

        let mut synthesized = [false; 2];
        let moves = [0, 1].map(|seat| match self.choices.get(&self.players[seat].id()) {
            Some(choice) => choice.clone(),
            None => {
                synthesized[seat] = true;
                Choice::STANDARD[rng.random_range(0..Choice::STANDARD.len())].clone()
            }
        });
        let winner = outcome::resolve(&moves[0], &moves[1]);

        tracing::debug!(
            round_id = %self.id,
            open_ms = self.open_for().as_millis() as u64,
            remaining_ms = self.timer.remaining().as_millis() as u64,
            "round closed"
        );

        Some(Resolution {
            round_id: self.id,
            players: self.players.clone(),
            moves,
            synthesized,
            winner,
        })
    }
}

/// The decided result of a round, ready to be sent to both seats.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub round_id: RoundId,
    pub players: [Participant; 2],
    /// Final moves by seat, including any synthesized ones.
    pub moves: [Choice; 2],
    /// Which seats had their move drawn at random.
    pub synthesized: [bool; 2],
    pub winner: Winner,
}

impl Resolution {
    /// The `result` payload addressed to `role`.
    pub fn result_for(&self, role: Role) -> ResultPayload {
        let seat = role.index();
        let other = role.opponent().index();
        ResultPayload {
            your_move: self.moves[seat].clone(),
            opponent_move: self.moves[other].clone(),
            outcome: self.winner.outcome_for(role),
        }
    }

    /// Sends each player their result. Closed connections are skipped.
    ///
    /// Returns how many results were queued.
    pub fn deliver(&self) -> usize {
        [Role::Player1, Role::Player2]
            .into_iter()
            .filter(|role| {
                self.players[role.index()].send(ServerMessage::Result(self.result_for(*role)))
            })
            .count()
    }
}
