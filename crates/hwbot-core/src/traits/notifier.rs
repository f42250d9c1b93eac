// # Notifier Trait
//
// Defines the interface for relaying messages to the chat recipient.
//
// ## Implementations
//
// - Telegram Bot API: `hwbot-telegram` crate

use async_trait::async_trait;

/// Trait for notifier implementations
///
/// A failed delivery is reported as [`Error::Delivery`](crate::Error::Delivery).
/// The engine logs it and carries on; notifiers must not retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a text message to the configured chat
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Message accepted by the messaging service
    /// - `Err(Error::Delivery)`: Message could not be delivered
    async fn send(&self, text: &str) -> Result<(), crate::Error>;

    /// Get the notifier name (for logging/debugging)
    fn notifier_name(&self) -> &'static str;
}
