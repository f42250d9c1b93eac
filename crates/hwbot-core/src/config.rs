//! Configuration types for the homework bot
//!
//! This module defines the credential loader and the engine settings.

use serde::{Deserialize, Serialize};

/// Environment variable holding the Practicum OAuth token
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the target chat id
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

/// Default Practicum homework status endpoint
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Upper bound for the look-back window (about a century)
pub const MAX_LOOKBACK_DAYS: u64 = 36_500;

const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// The three secrets the bot cannot start without
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the tokens.
#[derive(Clone)]
pub struct Credentials {
    /// Practicum OAuth token
    /// ⚠️ NEVER log this value
    pub practicum_token: String,

    /// Telegram bot token
    /// ⚠️ NEVER log this value
    pub telegram_token: String,

    /// Chat that receives notifications
    pub telegram_chat_id: String,
}

// Custom Debug implementation that hides the tokens
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<REDACTED>")
            .field("telegram_token", &"<REDACTED>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the process environment
    ///
    /// Fails with [`Error::MissingCredentials`](crate::Error::MissingCredentials)
    /// naming every variable that is unset or empty.
    pub fn from_env() -> Result<Self, crate::Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary lookup function
    ///
    /// # Parameters
    ///
    /// - `lookup`: Returns the value for a variable name, or `None` if unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let practicum_token = read(PRACTICUM_TOKEN_VAR);
        let telegram_token = read(TELEGRAM_TOKEN_VAR);
        let telegram_chat_id = read(TELEGRAM_CHAT_ID_VAR);

        if !missing.is_empty() {
            tracing::error!("Required environment variables are not set: {}", missing.join(", "));
            return Err(crate::Error::MissingCredentials(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

/// How the lower bound of the next fetch is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorPolicy {
    /// Move the cursor to the `current_date` reported by the API
    #[default]
    Advance,
    /// Always look back the same window from now
    FixedWindow,
}

impl std::str::FromStr for CursorPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advance" => Ok(Self::Advance),
            "fixed-window" | "fixed_window" | "fixed" => Ok(Self::FixedWindow),
            other => Err(crate::Error::config(format!(
                "Unknown cursor policy '{}'. Supported: advance, fixed-window",
                other
            ))),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Homework status endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Delay between poll cycles (in seconds)
    #[serde(default = "default_retry_period_secs")]
    pub retry_period_secs: u64,

    /// Initial look-back window (in days)
    ///
    /// With [`CursorPolicy::FixedWindow`] this window is used on every fetch.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u64,

    /// Cursor policy
    #[serde(default)]
    pub cursor_policy: CursorPolicy,

    /// Relay an empty homework list to the chat as well as logging it
    #[serde(default)]
    pub notify_on_empty: bool,

    /// Stop the engine when the API rejects the token
    #[serde(default = "default_stop_on_invalid_token")]
    pub stop_on_invalid_token: bool,

    /// Timeout applied to every outgoing HTTP request (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Capacity of the engine event channel
    ///
    /// When full, new events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl BotConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            endpoint: default_endpoint(),
            retry_period_secs: default_retry_period_secs(),
            lookback_days: default_lookback_days(),
            cursor_policy: CursorPolicy::default(),
            notify_on_empty: false,
            stop_on_invalid_token: default_stop_on_invalid_token(),
            http_timeout_secs: default_http_timeout_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "Endpoint must use HTTP or HTTPS scheme. Got: {}",
                self.endpoint
            )));
        }
        if self.retry_period_secs == 0 {
            return Err(crate::Error::config("Retry period must be > 0"));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(crate::Error::config(format!(
                "Look-back window must be at most {} days. Got: {}",
                MAX_LOOKBACK_DAYS, self.lookback_days
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }

    /// Look-back window in seconds
    pub fn lookback_secs(&self) -> i64 {
        i64::try_from(self.lookback_days)
            .unwrap_or(i64::MAX)
            .saturating_mul(SECS_PER_DAY)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_retry_period_secs() -> u64 {
    600
}

fn default_lookback_days() -> u64 {
    40
}

fn default_stop_on_invalid_token() -> bool {
    true
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_event_channel_capacity() -> usize {
    100
}
