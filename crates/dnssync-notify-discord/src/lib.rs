// # Discord Webhook Notifier
//
// This crate provides a Discord webhook implementation of the dnssync
// `Notifier` trait.
//
// ## API Reference
//
// - Execute Webhook: POST `/api/webhooks/:id/:token` with `{"content": "..."}`
// - Success is `204 No Content` (no `?wait=true`)
// - `content` is limited to 2000 characters
//
// ## Security Requirements
//
// - Webhook token NEVER appears in logs or error messages

use async_trait::async_trait;
use dnssync_core::config::NotifierConfig;
use dnssync_core::traits::Notifier;
use dnssync_core::{Error, Result};
use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;

/// Discord webhook base URL
pub const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";

/// Discord's limit on message content length, in characters
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Default HTTP timeout for webhook calls (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord webhook notifier
pub struct DiscordNotifier {
    /// Full webhook URL
    /// ⚠️ Contains the webhook token, NEVER log this value
    webhook_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("webhook_url", &"<REDACTED>")
            .finish()
    }
}

impl DiscordNotifier {
    /// Create a notifier posting to a full webhook URL
    pub fn new(webhook_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            webhook_url: webhook_url.into(),
            client,
        })
    }

    /// Create a notifier from webhook credentials
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        if config.webhook_id.is_empty() || config.webhook_token.is_empty() {
            return Err(Error::config("Discord webhook id and token are required"));
        }

        Self::new(format!(
            "{}/{}/{}",
            DISCORD_WEBHOOK_BASE, config.webhook_id, config.webhook_token
        ))
    }
}

/// Cut `message` to Discord's content limit
fn truncate_content(message: &str) -> String {
    if message.chars().count() <= MAX_CONTENT_CHARS {
        return message.to_string();
    }

    let mut content: String = message.chars().take(MAX_CONTENT_CHARS - 1).collect();
    content.push('…');
    content
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let payload = json!({ "content": truncate_content(message) });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Webhook request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::transport(format!("Webhook returned {} - {}", status, body)));
        }

        tracing::debug!("Discord webhook accepted message");
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "discord"
    }
}
