//! Homework record and verdict types
//!
//! A [`HomeworkRecord`] is built from one element of the API's `homeworks`
//! list. Only the two keys the bot cares about are read.

use crate::error::{Error, Result};
use serde_json::Value;

/// JSON key of the homework name
pub const NAME_KEY: &str = "homework_name";

/// JSON key of the review status
pub const STATUS_KEY: &str = "status";

/// Review outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Accepted by the reviewer
    Approved,
    /// Taken for review
    Reviewing,
    /// Returned with remarks
    Rejected,
}

impl Verdict {
    /// All known verdicts
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Wire key as sent by the API
    pub fn as_key(&self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    /// Localized text shown to the chat recipient
    pub fn display_text(&self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Verdict::ALL
            .into_iter()
            .find(|verdict| verdict.as_key() == s)
            .ok_or_else(|| Error::unexpected_status(s))
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// One submission's name and current verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeworkRecord {
    /// Homework name as reported by the API
    pub name: String,
    /// Current verdict
    pub status: Verdict,
}

impl HomeworkRecord {
    /// Create a record
    pub fn new(name: impl Into<String>, status: Verdict) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    /// Build a record from one element of the `homeworks` list
    ///
    /// Both `homework_name` and `status` must be present strings. A status
    /// outside [`Verdict::ALL`] is rejected rather than defaulted.
    pub fn from_json(value: &Value) -> Result<Self> {
        let name = value
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .ok_or(Error::MissingField { field: NAME_KEY })?;

        let status = value
            .get(STATUS_KEY)
            .ok_or(Error::MissingField { field: STATUS_KEY })?;
        let status = match status.as_str() {
            Some(raw) => raw.parse::<Verdict>()?,
            None => return Err(Error::unexpected_status(status.to_string())),
        };

        Ok(Self::new(name, status))
    }
}

/// A verdict that differs from what was last seen for the homework
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The record as just observed
    pub record: HomeworkRecord,
    /// Last seen verdict, `None` on first observation
    pub previous: Option<Verdict>,
}

impl StatusChange {
    /// Text sent to the chat for this change
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.record.name,
            self.record.status.display_text()
        )
    }
}
