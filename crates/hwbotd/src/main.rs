// # hwbotd - homework review status daemon
//
// This is a THIN integration layer: all polling, validation and tracking
// logic lives in hwbot-core.
//
// The hwbotd daemon is responsible for:
// 1. Loading `.env` and reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the Practicum source and the Telegram notifier
// 4. Running the poll engine until a shutdown signal
//
// ## Configuration
//
// ### Required
// - `PRACTICUM_TOKEN`: Practicum OAuth token
// - `TELEGRAM_TOKEN`: Telegram bot token
// - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//
// ### Optional
// - `HWBOT_RETRY_PERIOD_SECS`: Delay between polls (default 600)
// - `HWBOT_LOOKBACK_DAYS`: Initial look-back window (default 40)
// - `HWBOT_CURSOR_POLICY`: `advance` or `fixed-window` (default advance)
// - `HWBOT_NOTIFY_ON_EMPTY`: Report empty homework lists to the chat (default false)
// - `HWBOT_HTTP_TIMEOUT_SECS`: Per-request timeout (default 30)
// - `HWBOT_ENDPOINT`: Homework status endpoint
// - `HWBOT_LOG_LEVEL`: trace, debug, info, warn, error (default debug)
//
// ## Example
//
// ```bash
// export PRACTICUM_TOKEN=y0_your_token
// export TELEGRAM_TOKEN=123456:ABC-DEF
// export TELEGRAM_CHAT_ID=123456789
//
// hwbotd
// ```

use anyhow::{Context, Result};
use hwbot_core::{BotConfig, Credentials, CursorPolicy, EngineEvent, PollEngine};
use hwbot_practicum::PracticumClient;
use hwbot_telegram::TelegramNotifier;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum HwbotExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (invalid token, unexpected failure)
    RuntimeError = 2,
}

impl From<HwbotExitCode> for ExitCode {
    fn from(code: HwbotExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Read an optional variable through `lookup`, parsing it when set
fn optional_var<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        _ => Ok(None),
    }
}

/// Build the engine configuration from `HWBOT_*` variables
fn config_from_env() -> Result<BotConfig> {
    config_from_lookup(|name| env::var(name).ok())
}

fn config_from_lookup<F>(lookup: F) -> Result<BotConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = BotConfig::default();

    if let Some(endpoint) = optional_var::<String, _>(&lookup, "HWBOT_ENDPOINT")? {
        config.endpoint = endpoint;
    }
    if let Some(period) = optional_var(&lookup, "HWBOT_RETRY_PERIOD_SECS")? {
        config.retry_period_secs = period;
    }
    if let Some(days) = optional_var(&lookup, "HWBOT_LOOKBACK_DAYS")? {
        config.lookback_days = days;
    }
    if let Some(policy) = optional_var::<CursorPolicy, _>(&lookup, "HWBOT_CURSOR_POLICY")? {
        config.cursor_policy = policy;
    }
    if let Some(notify) = optional_var(&lookup, "HWBOT_NOTIFY_ON_EMPTY")? {
        config.notify_on_empty = notify;
    }
    if let Some(timeout) = optional_var(&lookup, "HWBOT_HTTP_TIMEOUT_SECS")? {
        config.http_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

fn log_level_from_env() -> Result<Level> {
    parse_log_level(env::var("HWBOT_LOG_LEVEL").ok())
}

fn parse_log_level(raw: Option<String>) -> Result<Level> {
    let raw = raw.unwrap_or_else(|| "debug".to_string());
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "HWBOT_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            raw
        ),
    }
}

/// Log engine events until the engine drops its sender
///
/// Returns the number of events received.
async fn log_events(mut event_rx: mpsc::Receiver<EngineEvent>) -> usize {
    let mut received = 0;
    while let Some(event) = event_rx.recv().await {
        received += 1;
        debug!("Engine event: {:?}", event);
    }
    received
}

fn main() -> ExitCode {
    // A missing .env file is fine; real environment variables still apply
    let _ = dotenv::dotenv();

    let log_level = match log_level_from_env() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HwbotExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HwbotExitCode::ConfigError.into();
    }

    // Credentials are checked before anything touches the network
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}. Make sure they are set in the environment or a local .env file", e);
            return HwbotExitCode::ConfigError.into();
        }
    };

    let config = match config_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration validation error: {}", e);
            return HwbotExitCode::ConfigError.into();
        }
    };

    info!("Starting hwbotd daemon");

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return HwbotExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(credentials, config).await {
            error!("Daemon error: {:#}", e);
            HwbotExitCode::RuntimeError
        } else {
            HwbotExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(credentials: Credentials, config: BotConfig) -> Result<()> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let source = PracticumClient::with_endpoint(
        credentials.practicum_token.clone(),
        config.endpoint.clone(),
        timeout,
    )
    .context("Failed to create Practicum client")?;

    let notifier = TelegramNotifier::with_api_base(
        credentials.telegram_token.clone(),
        credentials.telegram_chat_id.clone(),
        hwbot_telegram::TELEGRAM_API_BASE,
        timeout,
    )
    .context("Failed to create Telegram notifier")?;

    info!(
        "Cursor policy: {:?}, look-back: {} day(s)",
        config.cursor_policy, config.lookback_days
    );

    let (mut engine, event_rx) = PollEngine::new(Box::new(source), Box::new(notifier), config)
        .context("Failed to create poll engine")?;
    tokio::spawn(log_events(event_rx));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        match wait_for_shutdown().await {
            Ok(signal) => {
                info!("Received shutdown signal: {}", signal);
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                // Keep the sender alive so the engine is not stopped by a dropped channel
                error!("Shutdown handler error: {}", e);
                std::future::pending::<()>().await;
            }
        }
    });

    engine.run_with_shutdown(shutdown_rx).await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
