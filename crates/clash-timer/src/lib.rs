//! Cancellable deadline timers for Clash.
//!
//! A [`DeadlineTimer`] is a one-shot delayed callback: when armed it spawns
//! a Tokio task that sleeps until the deadline and then posts an event on
//! an unbounded channel. The owner of the receiving end decides what the
//! event means.
//!
//! # Integration
//!
//! The match engine keeps the receiving end inside its actor's
//! `tokio::select!` loop, next to its command channel:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(round_id) = deadline_rx.recv() => engine.handle_deadline(round_id),
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!     }
//! }
//! ```
//!
//! Cancelling aborts the sleeping task, but an event that was already posted
//! just before the cancel is still sitting in the channel. Receivers must
//! therefore check their own state before acting on an event; cancellation
//! alone is not a guarantee.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// Cap applied to durations that would overflow [`Instant`] (about 30 years).
pub const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// A one-shot timer that posts `event` to a channel once `after` elapses.
///
/// Dropping the timer cancels it.
#[derive(Debug)]
pub struct DeadlineTimer {
    deadline: Instant,
    task: JoinHandle<()>,
    cancelled: bool,
}

impl DeadlineTimer {
    /// Arms a timer. Must be called from within a Tokio runtime.
    ///
    /// If the receiving side is gone by the time the deadline elapses the
    /// event is dropped silently. A duration too large to represent as an
    /// instant is capped at [`FAR_FUTURE`], so the timer never fires in
    /// practice.
    pub fn arm<T: Send + 'static>(
        after: Duration,
        target: mpsc::UnboundedSender<T>,
        event: T,
    ) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(after)
            .unwrap_or_else(|| now + FAR_FUTURE);
        let task = tokio::spawn(async move {
            time::sleep_until(deadline).await;
            if target.send(event).is_err() {
                trace!("deadline elapsed but receiver is gone");
            }
        });

        debug!(after_ms = after.as_millis() as u64, "deadline timer armed");

        Self {
            deadline,
            task,
            cancelled: false,
        }
    }

    /// Cancels the timer.
    ///
    /// Returns `true` only for the call that actually cancelled it; later
    /// calls are no-ops returning `false`.
    pub fn cancel(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.cancelled = true;
        self.task.abort();
        trace!("deadline timer cancelled");
        true
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Time left until the deadline (zero once it has passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

impl Drop for DeadlineTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
