//! Response validation
//!
//! Turns the raw JSON body of the homework API into either the most recent
//! homework element or a typed error. An empty list is a normal outcome and
//! is returned as [`Homeworks::Empty`].

use crate::error::{Error, Result};
use serde_json::Value;

/// JSON key of the error code in an error body
pub const CODE_KEY: &str = "code";

/// JSON key of the homework list
pub const HOMEWORKS_KEY: &str = "homeworks";

/// JSON key of the server timestamp
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Contents of a well-formed homework list response
#[derive(Debug, Clone, PartialEq)]
pub enum Homeworks {
    /// The first (most recent) element of the list
    Latest(Value),
    /// The list was present but empty
    Empty,
}

/// Validate an API response
///
/// # Returns
///
/// - `Ok(Homeworks::Latest)`: The most recent homework element (unparsed)
/// - `Ok(Homeworks::Empty)`: No homeworks in the requested window
/// - `Err(Error)`: Error-coded body or unexpected shape
pub fn check_response(response: &Value) -> Result<Homeworks> {
    let body = response
        .as_object()
        .ok_or_else(|| Error::malformed(format!("expected a JSON object, got {}", kind_of(response))))?;

    if let Some(code) = body.get(CODE_KEY) {
        return Err(match code.as_str() {
            Some("UnknownError") => Error::UnexpectedArgument,
            Some("not_authenticated") => Error::InvalidToken,
            Some(other) => Error::ApiError {
                code: other.to_string(),
            },
            None => Error::ApiError {
                code: code.to_string(),
            },
        });
    }

    let Some(homeworks) = body.get(HOMEWORKS_KEY) else {
        return Err(Error::MissingHomeworkSection);
    };

    let list = homeworks.as_array().ok_or_else(|| {
        Error::malformed(format!("'{}' is {}, expected an array", HOMEWORKS_KEY, kind_of(homeworks)))
    })?;

    Ok(match list.first() {
        Some(latest) => Homeworks::Latest(latest.clone()),
        None => Homeworks::Empty,
    })
}

/// Server timestamp reported alongside the homework list
pub fn current_date(response: &Value) -> Option<i64> {
    response.get(CURRENT_DATE_KEY).and_then(Value::as_i64)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
