// # Status Tracker
//
// In-memory record of the last seen verdict per homework name.
//
// ## Lifetime
//
// - Created empty at startup, owned by the `PollEngine`
// - All state is lost on restart; the first poll after a restart reports
//   the current verdict as a change

use crate::homework::{HomeworkRecord, StatusChange, Verdict};
use std::collections::HashMap;

/// Result of observing a homework record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tracked {
    /// First observation or a different verdict; the map was updated
    Changed(StatusChange),
    /// Same verdict as last time; the map was not touched
    Unchanged(HomeworkRecord),
}

/// Last seen verdict per homework name
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    last_seen: HashMap<String, Verdict>,
}

impl StatusTracker {
    /// Create a new empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare a record with the stored verdict and record it if it differs
    pub fn observe(&mut self, record: HomeworkRecord) -> Tracked {
        let previous = self.last_seen.get(&record.name).copied();
        if previous == Some(record.status) {
            return Tracked::Unchanged(record);
        }

        self.last_seen.insert(record.name.clone(), record.status);
        Tracked::Changed(StatusChange { record, previous })
    }

    /// Last seen verdict for a homework
    pub fn last_status(&self, name: &str) -> Option<Verdict> {
        self.last_seen.get(name).copied()
    }

    /// Number of homeworks seen so far
    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    /// Check if nothing has been seen yet
    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}
