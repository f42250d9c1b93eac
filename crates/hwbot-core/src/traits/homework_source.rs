// # Homework Source Trait
//
// Defines the interface for fetching homework statuses from the review API.
//
// ## Implementations
//
// - Practicum HTTP API: `hwbot-practicum` crate
//
// ## Usage
//
// ```rust,ignore
// use hwbot_core::{HomeworkSource, check_response};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* HomeworkSource implementation */;
//
//     let body = source.fetch(1_700_000_000).await?;
//     let latest = check_response(&body)?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde_json::Value;

/// Trait for homework source implementations
///
/// # Single-Shot
///
/// Sources perform exactly one request per call and return the parsed body
/// untouched. They do not:
/// - Retry or sleep (the `PollEngine` repeats on its fixed interval)
/// - Interpret the body (owned by [`check_response`](crate::check_response))
/// - Remember anything between calls
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    /// Fetch homework statuses updated since `from_date`
    ///
    /// # Parameters
    ///
    /// - `from_date`: Unix timestamp (seconds), lower bound of the window
    ///
    /// # Returns
    ///
    /// - `Ok(Value)`: The parsed JSON body of a 200 response
    /// - `Err(Error::UnexpectedResponseStatus)`: Any other HTTP status
    /// - `Err(Error::Transport)`: DNS, timeout, connection failures
    /// - `Err(Error::MalformedResponse)`: Body is not JSON
    async fn fetch(&self, from_date: i64) -> Result<Value, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
