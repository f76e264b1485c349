//! The match engine: matchmaking plus the lifecycle of every open round.
//!
//! `MatchEngine` is plain synchronous state. It is driven by exactly one
//! task (see [`crate::spawn_engine`]), so join, move, deadline and
//! disconnect events are applied one at a time and a round can be resolved
//! at most once.

use clash_protocol::{Choice, PlayerId, Role, RoundId, ServerMessage, StartPayload};
use clash_session::Participant;
use clash_timer::DeadlineTimer;
use tokio::sync::mpsc;

use crate::matchmaker::{Matchmaker, Pairing};
use crate::{Round, RoundConfig, RoundError, RoundRegistry};

/// What a join request led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The participant is now in the waiting slot.
    Waiting,
    /// A round started with the participant as player2.
    Started(RoundId),
    /// Nothing changed: already waiting or already in an open round.
    Ignored,
}

/// What an accepted move led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; still waiting for the opponent.
    Recorded,
    /// Both moves are in and the round has been resolved.
    Resolved,
}

/// A point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub waiting: Option<PlayerId>,
    pub active_rounds: usize,
}

/// Owns the waiting slot and every open round.
#[derive(Debug)]
pub struct MatchEngine {
    config: RoundConfig,
    matchmaker: Matchmaker,
    registry: RoundRegistry,
    deadlines: mpsc::UnboundedSender<RoundId>,
    next_round_id: u64,
}

impl MatchEngine {
    /// Creates an engine whose round timers post to `deadlines`.
    pub fn new(config: RoundConfig, deadlines: mpsc::UnboundedSender<RoundId>) -> Self {
        Self {
            config: config.validated(),
            matchmaker: Matchmaker::new(),
            registry: RoundRegistry::new(),
            deadlines,
            next_round_id: 1,
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Pairs the participant or parks them in the waiting slot.
    ///
    /// Must be called inside a Tokio runtime: starting a round arms its
    /// deadline timer.
    pub fn request_join(&mut self, participant: Participant) -> JoinOutcome {
        let player_id = participant.id();
        if let Some(round_id) = self.registry.round_for(&player_id) {
            tracing::debug!(%player_id, %round_id, "join while in a round, ignoring");
            return JoinOutcome::Ignored;
        }

        match self.matchmaker.request_join(participant) {
            Pairing::AlreadyWaiting => {
                tracing::debug!(%player_id, "already waiting, ignoring join");
                JoinOutcome::Ignored
            }
            Pairing::Queued => {
                if let Some(waiting) = self.matchmaker.waiting() {
                    waiting.send(ServerMessage::Status(self.config.waiting_status.clone()));
                }
                tracing::info!(%player_id, "waiting for opponent");
                JoinOutcome::Waiting
            }
            Pairing::Paired { player1, player2 } => {
                let round_id = self.start_round(player1, player2);
                JoinOutcome::Started(round_id)
            }
        }
    }

    fn start_round(&mut self, player1: Participant, player2: Participant) -> RoundId {
        let round_id = RoundId(self.next_round_id);
        self.next_round_id += 1;

        let timer = DeadlineTimer::arm(self.config.deadline, self.deadlines.clone(), round_id);
        let countdown = self.config.countdown_secs();
        let round = Round::new(round_id, player1, player2, timer);

        for player in [Role::Player1, Role::Player2] {
            round.players()[player.index()]
                .send(ServerMessage::Start(StartPayload { player, countdown }));
        }

        tracing::info!(
            %round_id,
            player1 = %round.players()[0].id(),
            player2 = %round.players()[1].id(),
            countdown,
            "round started"
        );
        self.registry.insert(round);
        round_id
    }

    /// Records a move for the sender's open round, resolving it once both
    /// players have moved.
    ///
    /// # Errors
    /// - [`RoundError::NotInRound`] if the sender has no open round
    /// - [`RoundError::AlreadySubmitted`] on a repeated move
    pub fn submit_choice(
        &mut self,
        player_id: PlayerId,
        choice: Choice,
    ) -> Result<SubmitOutcome, RoundError> {
        let round_id = self
            .registry
            .round_for(&player_id)
            .ok_or(RoundError::NotInRound(player_id))?;
        let round = self
            .registry
            .get_mut(round_id)
            .ok_or(RoundError::NotFound(round_id))?;

        let complete = round.submit(player_id, choice)?;
        tracing::debug!(%player_id, %round_id, moves = round.choice_count(), "move recorded");

        if complete {
            self.resolve(round_id);
            Ok(SubmitOutcome::Resolved)
        } else {
            Ok(SubmitOutcome::Recorded)
        }
    }

    /// Handles a posted deadline. Returns `false` if the round was already
    /// resolved, which happens when the second move and the deadline race.
    pub fn handle_deadline(&mut self, round_id: RoundId) -> bool {
        if self.registry.get(round_id).is_none() {
            tracing::trace!(%round_id, "stale deadline, round already resolved");
            return false;
        }
        tracing::debug!(%round_id, "deadline reached");
        self.resolve(round_id)
    }

    fn resolve(&mut self, round_id: RoundId) -> bool {
        let Some(mut round) = self.registry.remove(round_id) else {
            return false;
        };
        let Some(resolution) = round.resolve(&mut rand::rng()) else {
            return false;
        };

        let delivered = resolution.deliver();
        tracing::info!(
            %round_id,
            player1_move = %resolution.moves[0],
            player2_move = %resolution.moves[1],
            synthesized = ?resolution.synthesized,
            winner = ?resolution.winner,
            delivered,
            "round resolved"
        );
        true
    }

    /// Forgets a disconnected participant.
    ///
    /// Only the waiting slot is touched: an open round keeps running and is
    /// resolved by its deadline, with the departed player's result skipped.
    /// Returns whether the participant was waiting.
    pub fn handle_disconnect(&mut self, player_id: PlayerId) -> bool {
        let was_waiting = self.matchmaker.remove_if_waiting(player_id);
        if was_waiting {
            tracing::debug!(%player_id, "waiting participant left");
        }
        was_waiting
    }

    pub fn info(&self) -> EngineInfo {
        EngineInfo {
            waiting: self.matchmaker.waiting().map(Participant::id),
            active_rounds: self.registry.len(),
        }
    }

    pub fn registry(&self) -> &RoundRegistry {
        &self.registry
    }
}
