//! Engine actor: a single Tokio task that owns the [`MatchEngine`].
//!
//! Connection handlers never touch engine state directly. They send
//! commands through an [`EngineHandle`]; round deadlines arrive on a second
//! channel fed by the round timers. The actor drains both in one loop, so
//! every state change is serialized.

use clash_protocol::{Choice, PlayerId, RoundId};
use clash_session::Participant;
use tokio::sync::{mpsc, oneshot};

use crate::{EngineInfo, JoinOutcome, MatchEngine, RoundConfig, RoundError};

/// Commands sent to the engine actor through its channel.
pub(crate) enum EngineCommand {
    /// Pair the participant or park them in the waiting slot.
    Join {
        participant: Participant,
        reply: oneshot::Sender<JoinOutcome>,
    },

    /// A move from a participant (fire-and-forget).
    Move { player_id: PlayerId, choice: Choice },

    /// The participant's connection closed.
    Disconnect { player_id: PlayerId },

    /// Request a snapshot of the engine.
    GetInfo { reply: oneshot::Sender<EngineInfo> },

    /// Stop the actor. Open rounds are dropped without results.
    Shutdown,
}

/// Handle to the running engine actor.
///
/// Cheap to clone; it's just an `mpsc::Sender` wrapper. Every connection
/// handler holds one.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Sends a join request and waits for what it led to.
    pub async fn join(&self, participant: Participant) -> Result<JoinOutcome, RoundError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(EngineCommand::Join {
                participant,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoundError::Unavailable)?;
        reply_rx.await.map_err(|_| RoundError::Unavailable)
    }

    /// Sends a move (fire-and-forget). Invalid moves are dropped by the
    /// engine without a reply.
    pub async fn submit_move(&self, player_id: PlayerId, choice: Choice) -> Result<(), RoundError> {
        self.sender
            .send(EngineCommand::Move { player_id, choice })
            .await
            .map_err(|_| RoundError::Unavailable)
    }

    /// Reports that a participant's connection closed.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoundError> {
        self.sender
            .send(EngineCommand::Disconnect { player_id })
            .await
            .map_err(|_| RoundError::Unavailable)
    }

    /// Requests the current engine info.
    pub async fn info(&self) -> Result<EngineInfo, RoundError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(EngineCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoundError::Unavailable)?;
        reply_rx.await.map_err(|_| RoundError::Unavailable)
    }

    /// Tells the engine to shut down.
    pub async fn shutdown(&self) -> Result<(), RoundError> {
        self.sender
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| RoundError::Unavailable)
    }
}

struct EngineActor {
    engine: MatchEngine,
    commands: mpsc::Receiver<EngineCommand>,
    deadlines: mpsc::UnboundedReceiver<RoundId>,
}

impl EngineActor {
    async fn run(mut self) {
        tracing::info!(
            deadline_ms = self.engine.config().deadline.as_millis() as u64,
            "match engine started"
        );

        loop {
            tokio::select! {
                biased;

                Some(round_id) = self.deadlines.recv() => {
                    self.engine.handle_deadline(round_id);
                }
                cmd = self.commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            open_rounds = self.engine.info().active_rounds,
            "match engine stopped"
        );
    }

    /// Applies one command. Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::Join { participant, reply } => {
                let outcome = self.engine.request_join(participant);
                let _ = reply.send(outcome);
            }
            EngineCommand::Move { player_id, choice } => {
                if let Err(reason) = self.engine.submit_choice(player_id, choice) {
                    tracing::debug!(%player_id, %reason, "move ignored");
                }
            }
            EngineCommand::Disconnect { player_id } => {
                self.engine.handle_disconnect(player_id);
            }
            EngineCommand::GetInfo { reply } => {
                let _ = reply.send(self.engine.info());
            }
            EngineCommand::Shutdown => {
                tracing::info!("match engine shutting down");
                return false;
            }
        }
        true
    }
}

/// Spawns the engine actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it fills up, handlers wait.
pub fn spawn_engine(config: RoundConfig, channel_size: usize) -> EngineHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));
    let (deadline_tx, deadline_rx) = mpsc::unbounded_channel();

    let actor = EngineActor {
        engine: MatchEngine::new(config, deadline_tx),
        commands: rx,
        deadlines: deadline_rx,
    };

    tokio::spawn(actor.run());

    EngineHandle { sender: tx }
}
