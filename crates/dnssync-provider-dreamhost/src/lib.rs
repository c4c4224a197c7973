// # DreamHost DNS Record Store
//
// This crate provides a DreamHost implementation of the dnssync
// `RecordStore` trait.
//
// ## Behavior
//
// - ✅ One HTTP request per trait call
// - ✅ Full error propagation (no retry, no backoff)
// - ✅ HTTP timeout configured (10 seconds)
// - ✅ Provider-reported failures (`result: error`) surfaced with the raw body
// - ✅ Dry-run mode for safe testing
// - ❌ NO retry logic
// - ❌ NO caching between calls
//
// ## Security Requirements
//
// - API key NEVER appears in logs or error messages
// - API key MUST be provided via environment variables only
//
// ## API Reference
//
// - DreamHost API: https://help.dreamhost.com/hc/en-us/articles/217560167
// - Every command is `GET /?key=<key>&format=json&cmd=<cmd>&...`
// - `dns-list_records`: all records of the account
// - `dns-add_record`: `record`, `type`, `value`
// - `dns-remove_record`: `record`, `type`, `value`

use async_trait::async_trait;
use dnssync_core::config::{ProviderConfig, normalize_record_name};
use dnssync_core::traits::RecordStore;
use dnssync_core::{Error, ExistingRecord, RecordType, Result};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// DreamHost API base URL
pub const DREAMHOST_API_BASE: &str = "https://api.dreamhost.com/";

/// Default HTTP timeout for API requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

const PROVIDER: &str = "dreamhost";

const CMD_LIST: &str = "dns-list_records";
const CMD_ADD: &str = "dns-add_record";
const CMD_REMOVE: &str = "dns-remove_record";

/// Envelope shared by every DreamHost API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: String,
    #[serde(default)]
    data: Value,
}

/// One entry of a `dns-list_records` response
///
/// DreamHost also sends `account_id`, `zone`, `editable` and `comment`.
#[derive(Debug, Deserialize)]
struct ApiRecord {
    record: String,
    #[serde(rename = "type")]
    record_type: String,
    value: String,
}

/// DreamHost record store
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the store will:
/// - Perform `dns-list_records` normally
/// - Log the intended add/remove commands
/// - **NOT** actually modify DNS records
pub struct DreamhostRecordStore {
    /// DreamHost API key
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API endpoint
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, list records but skip mutations
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for DreamhostRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DreamhostRecordStore")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl DreamhostRecordStore {
    /// Create a new DreamHost record store
    ///
    /// # Parameters
    ///
    /// - `api_token`: DreamHost API key with `dns-*` permissions
    /// - `api_base`: API endpoint, [`DREAMHOST_API_BASE`] in production
    /// - `dry_run`: If true, list records but skip add/remove
    pub fn new(api_token: impl Into<String>, api_base: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("DreamHost API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            api_base: api_base.into(),
            client,
            dry_run,
        })
    }

    /// Create a record store from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DREAMHOST_API_BASE.to_string());

        if config.dry_run {
            tracing::warn!("DreamHost record store running in DRY-RUN mode - no changes will be made");
        }

        Self::new(config.api_token.clone(), api_base, config.dry_run)
    }

    /// Execute one API command and return its `data` payload
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /?key=<key>&format=json&cmd=<cmd>&<params>
    /// ```
    async fn call(&self, cmd: &str, params: &[(&str, &str)]) -> Result<Value> {
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.api_token.as_str()),
            ("format", "json"),
            ("cmd", cmd),
        ];
        query.extend_from_slice(params);

        tracing::debug!("DreamHost API call: {}", cmd);

        // The request URL carries the key, so it is stripped from errors
        let response = self
            .client
            .get(&self.api_base)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::transport(format!("{} request failed: {}", cmd, e.without_url())))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("{} failed to read response: {}", cmd, e.without_url())))?;

        if !status.is_success() {
            return Err(Error::transport(format!("{} returned HTTP {}: {}", cmd, status, text)));
        }

        let parsed: ApiResponse = serde_json::from_str(&text).map_err(|e| {
            Error::data(format!("{} returned malformed JSON: {}. Response: {}", cmd, e, text))
        })?;

        if parsed.result != "success" {
            return Err(Error::provider(PROVIDER, text));
        }

        Ok(parsed.data)
    }

    async fn mutate(&self, cmd: &str, name: &str, record_type: RecordType, value: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would {} {} ({}) value {}",
                if cmd == CMD_ADD { "add" } else { "remove" },
                name,
                record_type,
                value
            );
            return Ok(());
        }

        let data = self
            .call(
                cmd,
                &[
                    ("record", name),
                    ("type", record_type.as_str()),
                    ("value", value),
                ],
            )
            .await?;

        tracing::debug!("{} {} ({}) {}: {}", cmd, name, record_type, value, data);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for DreamhostRecordStore {
    async fn list(&self) -> Result<Vec<ExistingRecord>> {
        let data = self.call(CMD_LIST, &[]).await?;

        let records: Vec<ApiRecord> = serde_json::from_value(data)
            .map_err(|e| Error::data(format!("{} data is not a record list: {}", CMD_LIST, e)))?;

        let total = records.len();
        let existing: Vec<ExistingRecord> = records
            .into_iter()
            .filter_map(|r| {
                let record_type = r.record_type.parse::<RecordType>().ok()?;
                Some(ExistingRecord::new(
                    normalize_record_name(&r.record),
                    record_type,
                    r.value,
                ))
            })
            .collect();

        tracing::debug!(
            "Listed {} record(s), {} of them A/AAAA",
            total,
            existing.len()
        );
        Ok(existing)
    }

    async fn add(&self, name: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.mutate(CMD_ADD, name, record_type, value).await
    }

    async fn remove(&self, name: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.mutate(CMD_REMOVE, name, record_type, value).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dry_run: bool) -> ProviderConfig {
        ProviderConfig {
            api_token: "ABCDEF123456".to_string(),
            api_base: None,
            dry_run,
        }
    }

    #[test]
    fn test_from_config_defaults_base() {
        let store = DreamhostRecordStore::from_config(&config(false)).unwrap();
        assert_eq!(store.api_base, DREAMHOST_API_BASE);
        assert!(!store.is_dry_run());
    }

    #[test]
    fn test_dry_run_mode() {
        let store = DreamhostRecordStore::from_config(&config(true)).unwrap();
        assert!(store.is_dry_run());
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = DreamhostRecordStore::new("", DREAMHOST_API_BASE, false);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_provider_name() {
        let store = DreamhostRecordStore::from_config(&config(false)).unwrap();
        assert_eq!(store.provider_name(), "dreamhost");
    }

    #[test]
    fn test_api_token_not_exposed_in_debug() {
        let store = DreamhostRecordStore::new("secret_key_12345", DREAMHOST_API_BASE, false).unwrap();

        let debug_str = format!("{:?}", store);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("DreamhostRecordStore"));
    }

    #[tokio::test]
    async fn test_dry_run_mutations_skip_network() {
        // Unroutable base: any real request would fail
        let store = DreamhostRecordStore::new("ABCDEF123456", "http://127.0.0.1:9/", true).unwrap();

        store.add("h.example.com", RecordType::A, "1.2.3.4").await.unwrap();
        store.remove("h.example.com", RecordType::A, "9.9.9.9").await.unwrap();
    }
}
