//! Server configuration.

use std::time::Duration;

use clash_round::RoundConfig;
use serde::{Deserialize, Serialize};

use crate::ClashError;

/// Default command queue size for the engine actor.
const DEFAULT_ENGINE_CHANNEL_SIZE: usize = 256;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Settings shared by every round.
    pub round: RoundConfig,

    /// Bound on the engine's command queue.
    pub engine_channel_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            round: RoundConfig::default(),
            engine_channel_size: DEFAULT_ENGINE_CHANNEL_SIZE,
        }
    }
}

impl ServerConfig {
    /// Reads `PORT` and `CLASH_ROUND_DEADLINE_SECS` from the environment.
    ///
    /// # Errors
    /// [`ClashError::Config`] if either variable is set but not a number, or
    /// if the deadline exceeds [`RoundConfig::MAX_DEADLINE`].
    pub fn from_env() -> Result<Self, ClashError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClashError> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            let port: u16 = port.trim().parse().map_err(|_| {
                ClashError::Config(format!("PORT must be a port number, got {port:?}"))
            })?;
            config.bind_addr = format!("0.0.0.0:{port}");
        }

        if let Some(secs) = lookup("CLASH_ROUND_DEADLINE_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ClashError::Config(format!(
                    "CLASH_ROUND_DEADLINE_SECS must be a whole number of seconds, got {secs:?}"
                ))
            })?;
            let max = RoundConfig::MAX_DEADLINE.as_secs();
            if secs > max {
                return Err(ClashError::Config(format!(
                    "CLASH_ROUND_DEADLINE_SECS must be at most {max}, got {secs}"
                )));
            }
            config.round.deadline = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
