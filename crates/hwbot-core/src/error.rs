//! Error types for the homework bot
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for homework bot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the homework bot
#[derive(Error, Debug)]
pub enum Error {
    /// One or more required credentials are absent from the environment
    #[error("Missing credentials: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failures (DNS, timeout, connection reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The homework API answered with a status other than 200
    #[error("Unexpected response status from homework API: {status}")]
    UnexpectedResponseStatus {
        /// HTTP status code
        status: u16,
    },

    /// Body is not JSON or does not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// API reported `UnknownError`, usually a bad `from_date`
    #[error("Unexpected argument in homework API request")]
    UnexpectedArgument,

    /// API reported `not_authenticated`
    #[error("Practicum token is incorrect, check PRACTICUM_TOKEN")]
    InvalidToken,

    /// API reported an error code this bot does not know about
    #[error("Homework API returned error code '{code}'")]
    ApiError {
        /// Raw `code` value
        code: String,
    },

    /// Response has neither an error code nor a homework list
    #[error("No homework list in API response")]
    MissingHomeworkSection,

    /// A homework record lacks a required key
    #[error("Homework record is missing field '{field}'")]
    MissingField {
        /// Name of the absent key
        field: &'static str,
    },

    /// Status value outside the known verdict set
    #[error("Status '{status}' is unexpected, check the homework API for changes")]
    UnexpectedStatus {
        /// Offending status value
        status: String,
    },

    /// Message could not be delivered to the chat
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Create an unexpected status error
    pub fn unexpected_status(status: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status: status.into(),
        }
    }

    /// Errors after which polling again cannot succeed
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCredentials(_) | Self::InvalidToken)
    }

    /// Whether this error came from the notifier
    pub fn is_delivery(&self) -> bool {
        matches!(self, Self::Delivery(_))
    }
}
