// # Notifier Trait
//
// Defines the interface for posting run results to a chat channel.
//
// ## Implementations
//
// - Discord webhook: `dnssync-notify-discord` crate
//
// Delivery is best-effort: the engine logs a failed `send` and carries on.

use async_trait::async_trait;

/// Trait for notification channel implementations
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a message
    ///
    /// `message` may contain Discord-style markup (backticks, `:emoji:`
    /// shortcodes, fenced code blocks).
    async fn send(&self, message: &str) -> Result<(), crate::Error>;

    /// Get the channel name (for logging/debugging)
    fn channel_name(&self) -> &'static str;
}
