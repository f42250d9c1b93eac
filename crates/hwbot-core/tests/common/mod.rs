//! Test doubles and common utilities for engine contract tests
//!
//! This module provides minimal test doubles that record how the engine
//! drives its collaborators.

#![allow(dead_code)]

use hwbot_core::config::{BotConfig, CursorPolicy};
use hwbot_core::error::{Error, Result};
use hwbot_core::traits::{HomeworkSource, Notifier};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A HomeworkSource that replays scripted answers
///
/// Once the script is exhausted, the last answer is repeated.
pub struct ScriptedSource {
    /// Remaining answers
    script: Arc<Mutex<VecDeque<Result<Value>>>>,
    /// Last answer, replayed when the script runs out
    last: Arc<Mutex<Option<Value>>>,
    /// `from_date` of every fetch
    from_dates: Arc<Mutex<Vec<i64>>>,
    /// Call counter for fetch()
    fetch_call_count: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<Value>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            last: Arc::new(Mutex::new(None)),
            from_dates: Arc::new(Mutex::new(Vec::new())),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times fetch() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the `from_date` passed to each fetch
    pub fn from_dates(&self) -> Vec<i64> {
        self.from_dates.lock().unwrap().clone()
    }

    /// Create a new ScriptedSource that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
            last: Arc::clone(&other.last),
            from_dates: Arc::clone(&other.from_dates),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
        }
    }
}

#[async_trait::async_trait]
impl HomeworkSource for ScriptedSource {
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.from_dates.lock().unwrap().push(from_date);

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(body)) => {
                *self.last.lock().unwrap() = Some(body.clone());
                Ok(body)
            }
            Some(Err(e)) => Err(e),
            None => self
                .last
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| Error::transport("script exhausted")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A Notifier that records every message
pub struct RecordingNotifier {
    /// Messages handed to send()
    messages: Arc<Mutex<Vec<String>>>,
    /// When set, every send fails
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// A notifier whose deliveries always fail (messages are still recorded)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Messages handed to send(), in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    /// Create a new RecordingNotifier that shares messages with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            messages: Arc::clone(&other.messages),
            fail: other.fail,
        }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(Error::delivery("Forbidden: bot was blocked by the user"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A homework list body with a single homework
pub fn homework_body(name: &str, status: &str, current_date: i64) -> Value {
    json!({
        "homeworks": [
            {
                "id": 123,
                "homework_name": name,
                "status": status,
                "reviewer_comment": "",
                "lesson_name": "Final project"
            }
        ],
        "current_date": current_date
    })
}

/// An empty homework list body
pub fn empty_body(current_date: i64) -> Value {
    json!({ "homeworks": [], "current_date": current_date })
}

/// Helper to create a minimal BotConfig for testing
pub fn minimal_config(cursor_policy: CursorPolicy) -> BotConfig {
    BotConfig {
        endpoint: "http://127.0.0.1:9/api/user_api/homework_statuses/".to_string(),
        retry_period_secs: 600,
        lookback_days: 40,
        cursor_policy,
        notify_on_empty: false,
        stop_on_invalid_token: true,
        http_timeout_secs: 5,
        event_channel_capacity: 100,
    }
}

/// Drain every event currently buffered in the channel
pub fn drain_events(
    rx: &mut tokio::sync::mpsc::Receiver<hwbot_core::EngineEvent>,
) -> Vec<hwbot_core::EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
