//! Round configuration and state machine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoundConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every round an engine creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// How long a round stays open before missing moves are synthesized.
    pub deadline: Duration,

    /// Status text sent to a participant parked in the waiting slot.
    pub waiting_status: String,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            deadline: Self::DEFAULT_DEADLINE,
            waiting_status: "Waiting for opponent...".to_string(),
        }
    }
}

impl RoundConfig {
    /// Deadline used when none (or zero) is configured.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

    /// Longest deadline a round may have.
    pub const MAX_DEADLINE: Duration = Duration::from_secs(24 * 60 * 60);

    /// Creates a config with a custom deadline and default status text.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline,
            ..Default::default()
        }
    }

    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// Called automatically by `MatchEngine::new`. A zero deadline would
    /// resolve every round before anyone could move, so it is replaced by
    /// [`Self::DEFAULT_DEADLINE`]. Anything above [`Self::MAX_DEADLINE`] is
    /// clamped to it.
    pub fn validated(mut self) -> Self {
        if self.deadline.is_zero() {
            tracing::warn!(
                default_secs = Self::DEFAULT_DEADLINE.as_secs(),
                "round deadline is zero, using default"
            );
            self.deadline = Self::DEFAULT_DEADLINE;
        } else if self.deadline > Self::MAX_DEADLINE {
            tracing::warn!(
                requested_secs = self.deadline.as_secs(),
                max_secs = Self::MAX_DEADLINE.as_secs(),
                "round deadline too long, clamping"
            );
            self.deadline = Self::MAX_DEADLINE;
        }
        self
    }

    /// The deadline as announced to clients in `start`, rounded up to
    /// whole seconds.
    pub fn countdown_secs(&self) -> u64 {
        let secs = self.deadline.as_secs();
        if self.deadline.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        }
    }
}

// ---------------------------------------------------------------------------
// RoundState
// ---------------------------------------------------------------------------

/// The lifecycle state of a round.
///
/// ```text
/// Open ──(second move | deadline)──→ Resolved
/// ```
///
/// - **Open**: created, waiting for 0, 1 or 2 moves.
/// - **Resolved**: terminal. Results have been sent and the round has left
///   the registry. A round never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Open,
    Resolved,
}

impl RoundState {
    /// Returns `true` while moves are still accepted.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Resolved => write!(f, "Resolved"),
        }
    }
}
