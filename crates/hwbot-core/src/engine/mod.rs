//! Core polling engine
//!
//! The PollEngine is responsible for:
//! - Fetching homework statuses via HomeworkSource
//! - Validating the response and extracting the latest homework
//! - Checking the StatusTracker for a verdict change
//! - Relaying changes and failures via Notifier
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐
//! │ HomeworkSource │─── JSON body ───┐
//! └────────────────┘                 │
//!                                    ▼
//!                           ┌──────────────┐
//!                           │  PollEngine  │
//!                           └──────────────┘
//!                                    │
//!         ┌──────────────────────────┼──────────────────────────┐
//!         │                          │                          │
//!         ▼                          ▼                          ▼
//! ┌───────────────┐          ┌──────────────┐          ┌─────────────┐
//! │ StatusTracker │          │   Notifier   │          │   Events    │
//! │ (diff)        │          │   (relay)    │          │  (monitor)  │
//! └───────────────┘          └──────────────┘          └─────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Fetch from the current cursor
//! 2. Validate the body, take the most recent homework
//! 3. Diff against the tracker
//! 4. If changed, notify
//! 5. Advance the cursor
//! 6. Sleep the retry period, whatever happened

use crate::config::{BotConfig, CursorPolicy};
use crate::error::{Error, Result};
use crate::homework::{HomeworkRecord, StatusChange, Verdict};
use crate::response::{self, Homeworks};
use crate::tracker::{StatusTracker, Tracked};
use crate::traits::{HomeworkSource, Notifier};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Prefix of every failure report sent to the chat
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// Events emitted by the PollEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        cursor: i64,
    },

    /// Latest homework has a new verdict
    StatusChanged {
        homework_name: String,
        status: Verdict,
        previous: Option<Verdict>,
    },

    /// Latest homework still has the last seen verdict
    StatusUnchanged {
        homework_name: String,
        status: Verdict,
    },

    /// API returned an empty homework list
    EmptyHomeworkList,

    /// Notifier accepted a message
    NotificationSent,

    /// Notifier failed to deliver a message
    NotificationFailed {
        error: String,
    },

    /// A poll cycle ended with an error
    CycleFailed {
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Successful result of one fetch → validate → track pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// New homework or new verdict
    Changed(StatusChange),
    /// Verdict equal to the last seen one
    Unchanged(HomeworkRecord),
    /// No homeworks in the requested window
    Empty,
}

/// Core polling engine
///
/// The engine owns the status tracker and the poll cursor. It runs on a
/// single task and is driven by a fixed-delay loop.
///
/// ## Lifecycle
///
/// 1. Create with [`PollEngine::new()`]
/// 2. Start with [`PollEngine::run_with_shutdown()`]
/// 3. Engine runs until a shutdown signal or a fatal API error
pub struct PollEngine {
    /// Source of homework statuses
    source: Box<dyn HomeworkSource>,

    /// Notifier for chat messages
    notifier: Box<dyn Notifier>,

    /// Last seen verdict per homework
    tracker: StatusTracker,

    /// Lower bound for the next fetch (unix seconds)
    cursor: i64,

    /// Engine settings
    config: BotConfig,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl PollEngine {
    /// Create a new polling engine
    ///
    /// # Parameters
    ///
    /// - `source`: Homework source implementation
    /// - `notifier`: Notifier implementation
    /// - `config`: Engine configuration
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        source: Box<dyn HomeworkSource>,
        notifier: Box<dyn Notifier>,
        config: BotConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);
        let cursor = now() - config.lookback_secs();

        let engine = Self {
            source,
            notifier,
            tracker: StatusTracker::new(),
            cursor,
            config,
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Current poll cursor
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Tracker state
    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    /// Run the engine until `shutdown_rx` fires
    ///
    /// The daemon fires it on SIGTERM or SIGINT. A dropped sender also
    /// stops the loop.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: Fatal error (invalid token)
    pub async fn run_with_shutdown(&mut self, shutdown_rx: oneshot::Receiver<()>) -> Result<()> {
        self.emit_event(EngineEvent::Started {
            cursor: self.cursor,
        });
        info!(
            "Polling {} every {}s via {}, notifying via {}",
            self.config.endpoint,
            self.config.retry_period_secs,
            self.source.source_name(),
            self.notifier.notifier_name()
        );

        let shutdown = async move {
            let _ = shutdown_rx.await;
        };
        tokio::pin!(shutdown);

        let period = Duration::from_secs(self.config.retry_period_secs);

        loop {
            tokio::select! {
                result = self.run_cycle() => {
                    if let Err(e) = result {
                        error!("Stopping engine: {}", e);
                        self.emit_event(EngineEvent::Stopped {
                            reason: e.to_string(),
                        });
                        return Err(e);
                    }
                }
                _ = &mut shutdown => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(period) => {}
                _ = &mut shutdown => break,
            }
        }

        info!("Shutdown signal received");
        self.emit_event(EngineEvent::Stopped {
            reason: "Shutdown signal".to_string(),
        });
        Ok(())
    }

    /// Run one poll cycle and route its outcome
    ///
    /// Every error is logged and reported to the chat. Only an invalid token
    /// (with `stop_on_invalid_token`) is returned, so the loop can stop
    /// instead of spinning on a credential that will never work.
    pub async fn run_cycle(&mut self) -> Result<()> {
        match self.poll().await {
            Ok(PollOutcome::Changed(change)) => {
                info!(
                    "Homework {} status changed: {:?} -> {}",
                    change.record.name, change.previous, change.record.status
                );
                self.emit_event(EngineEvent::StatusChanged {
                    homework_name: change.record.name.clone(),
                    status: change.record.status,
                    previous: change.previous,
                });
                self.notify(&change.message()).await;
            }
            Ok(PollOutcome::Unchanged(record)) => {
                debug!(
                    "No new statuses for {}, last status is {}",
                    record.name, record.status
                );
                self.emit_event(EngineEvent::StatusUnchanged {
                    homework_name: record.name,
                    status: record.status,
                });
            }
            Ok(PollOutcome::Empty) => {
                debug!("Homework list is empty");
                self.emit_event(EngineEvent::EmptyHomeworkList);
                if self.config.notify_on_empty {
                    self.notify(&format!("{}: список домашних работ пуст", FAILURE_PREFIX))
                        .await;
                }
            }
            Err(e) => {
                error!("{}: {}", FAILURE_PREFIX, e);
                self.emit_event(EngineEvent::CycleFailed {
                    error: e.to_string(),
                });
                self.notify(&format!("{}: {}", FAILURE_PREFIX, e)).await;

                if matches!(e, Error::InvalidToken) && self.config.stop_on_invalid_token {
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Fetch, validate and track once
    ///
    /// The cursor is advanced only when all three steps succeed.
    pub async fn poll(&mut self) -> Result<PollOutcome> {
        let from_date = self.from_date();
        debug!(
            "Fetching homework statuses since {}",
            chrono::DateTime::from_timestamp(from_date, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| from_date.to_string())
        );

        let body = self.source.fetch(from_date).await?;

        let outcome = match response::check_response(&body)? {
            Homeworks::Empty => PollOutcome::Empty,
            Homeworks::Latest(latest) => {
                let record = HomeworkRecord::from_json(&latest)?;
                match self.tracker.observe(record) {
                    Tracked::Changed(change) => PollOutcome::Changed(change),
                    Tracked::Unchanged(record) => PollOutcome::Unchanged(record),
                }
            }
        };

        self.advance_cursor(response::current_date(&body));
        Ok(outcome)
    }

    /// Lower bound for the next fetch
    fn from_date(&self) -> i64 {
        match self.config.cursor_policy {
            CursorPolicy::Advance => self.cursor,
            CursorPolicy::FixedWindow => now() - self.config.lookback_secs(),
        }
    }

    fn advance_cursor(&mut self, current_date: Option<i64>) {
        if self.config.cursor_policy == CursorPolicy::Advance {
            self.cursor = current_date.unwrap_or_else(now);
        }
    }

    /// Send a message, swallowing delivery failures
    async fn notify(&self, text: &str) {
        match self.notifier.send(text).await {
            Ok(()) => {
                debug!("Message was sent successfully");
                self.emit_event(EngineEvent::NotificationSent);
            }
            Err(e) => {
                error!("Failed to send message via {}: {}", self.notifier.notifier_name(), e);
                self.emit_event(EngineEvent::NotificationFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_event_clone_eq() {
        let event = EngineEvent::StatusChanged {
            homework_name: "hw1".to_string(),
            status: Verdict::Approved,
            previous: Some(Verdict::Reviewing),
        };

        assert_eq!(event.clone(), event);
    }
}
