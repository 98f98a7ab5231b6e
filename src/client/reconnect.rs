//! Reconnection supervisor.
//!
//! When the link drops the wait grows linearly with the attempt count
//! (`base * attempt`: 5s, 10s, 15s, ...) and falls back to the base once the
//! server welcomes us again.

use std::time::Duration;

use crate::client::session::{LossOutcome, Session};

/// How long to wait between reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub base_delay: Duration,
    /// Ceiling on a single wait. `None` means unbounded.
    pub max_delay: Option<Duration>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(5),
            max_delay: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.saturating_mul(attempt.max(1));
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

/// What the client should do after a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Wait this long, then call [`Session::begin_retry`] and reconnect.
    RetryAfter(Duration),
    /// Reconnection is disabled: stop the run loop.
    Stop,
    /// The loss was already handled.
    Nothing,
}

/// Decide how to recover from a lost connection.
pub fn on_lost(session: &mut Session, policy: &ReconnectPolicy) -> Recovery {
    match session.mark_lost() {
        LossOutcome::Reconnect { attempt } => {
            let delay = policy.delay_for(attempt);
            tracing::info!(attempt, delay_secs = delay.as_secs(), "reconnecting after delay");
            Recovery::RetryAfter(delay)
        }
        LossOutcome::Stop => Recovery::Stop,
        LossOutcome::Ignored => Recovery::Nothing,
    }
}
