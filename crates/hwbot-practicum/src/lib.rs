// # Practicum Homework Source
//
// This crate provides the Practicum homework-status API source for the bot.
//
// ## Behavior
//
// - ✅ Makes one HTTP GET per engine cycle
// - ✅ Sends `Authorization: OAuth <token>` and a `from_date` query parameter
// - ✅ HTTP timeout configured (30 seconds by default)
// - ✅ Distinct errors for transport failures, non-200 statuses and bad JSON
// - ❌ NO retry logic (the engine repeats on its fixed interval)
// - ❌ NO interpretation of the body (owned by `check_response`)
//
// ## Security Requirements
//
// - Token NEVER appears in logs or in Debug output
// - Token MUST be provided via environment variables only
//
// ## API Reference
//
// - GET `/api/user_api/homework_statuses/?from_date=<unix_ts>`

use async_trait::async_trait;
use hwbot_core::traits::HomeworkSource;
use hwbot_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

pub use hwbot_core::config::DEFAULT_ENDPOINT;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Practicum homework-status API client
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the token.
pub struct PracticumClient {
    /// Practicum OAuth token
    /// ⚠️ NEVER log this value
    token: String,

    /// Homework status endpoint
    endpoint: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the token
impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("token", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    /// Create a client for the default endpoint
    ///
    /// # Parameters
    ///
    /// - `token`: Practicum OAuth token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(token, DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom endpoint and timeout
    ///
    /// # Parameters
    ///
    /// - `token`: Practicum OAuth token
    /// - `endpoint`: Full URL of the homework status endpoint
    /// - `timeout`: Timeout applied to each request
    pub fn with_endpoint(
        token: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::config("Practicum token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            token,
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Endpoint this client polls
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    /// Fetch homework statuses updated since `from_date`
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /api/user_api/homework_statuses/?from_date=1700000000
    /// Authorization: OAuth <token>
    /// ```
    async fn fetch(&self, from_date: i64) -> Result<Value> {
        tracing::debug!("Requesting {} with from_date={}", self.endpoint, from_date);

        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to homework API failed: {}", e.without_url())))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!("Homework API answered with status {}", status);
            return Err(Error::UnexpectedResponseStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response body: {}", e.without_url())))?;

        serde_json::from_slice(&body)
            .map_err(|e| Error::malformed(format!("Response body is not valid JSON: {}", e)))
    }

    fn source_name(&self) -> &'static str {
        "practicum"
    }
}
