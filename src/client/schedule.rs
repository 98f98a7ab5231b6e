//! Delayed and timed sends.
//!
//! Each scheduled send is its own task holding a copy of the line. When it
//! fires it goes through [`ClientHandle::send_raw`], so it is framed and
//! checked against the link state at that moment, not when it was scheduled.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::task::JoinHandle;

use crate::client::ClientHandle;
use crate::error::SendError;
use crate::irc::commands;

/// A pending send. Dropping it does not cancel it.
#[derive(Debug)]
pub struct ScheduledSend {
    task: JoinHandle<Result<(), SendError>>,
}

impl ScheduledSend {
    /// Wait for the send to fire and return its outcome.
    pub async fn wait(self) -> Result<(), SendError> {
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(SendError::Cancelled),
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl ClientHandle {
    /// Send `line` after `delay`. Must be called from within a tokio runtime.
    pub fn send_after(&self, delay: Duration, line: impl Into<String>) -> ScheduledSend {
        let handle = self.clone();
        let line = line.into();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = handle.send_raw(&line);
            if let Err(e) = &result {
                tracing::warn!(error = %e, "scheduled send failed");
            }
            result
        });
        ScheduledSend { task }
    }

    /// Send `line` at wall-clock time `when`; a time in the past fires at once.
    pub fn send_at(&self, when: DateTime<Local>, line: impl Into<String>) -> ScheduledSend {
        self.send_after(until(when), line)
    }

    pub fn privmsg_after(&self, delay: Duration, target: &str, text: &str) -> ScheduledSend {
        self.send_after(delay, commands::privmsg(target, text))
    }

    pub fn privmsg_at(&self, when: DateTime<Local>, target: &str, text: &str) -> ScheduledSend {
        self.send_at(when, commands::privmsg(target, text))
    }

    pub fn action_after(&self, delay: Duration, target: &str, text: &str) -> ScheduledSend {
        self.send_after(delay, commands::action(target, text))
    }

    pub fn action_at(&self, when: DateTime<Local>, target: &str, text: &str) -> ScheduledSend {
        self.send_at(when, commands::action(target, text))
    }
}

fn until(when: DateTime<Local>) -> Duration {
    (when - Local::now()).to_std().unwrap_or(Duration::ZERO)
}
