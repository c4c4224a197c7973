//! Configuration types for dnssync
//!
//! All configuration comes from environment variables (the binary may
//! pre-load them from a `.env` file). [`SyncConfig::from_env`] reads them
//! once at startup; nothing else in the workspace touches the environment.
//!
//! ## Variables
//!
//! - `DREAMHOST_API_TOKEN`: provider API key (required)
//! - `TARGET_RECORDS`: comma-separated `name:type` pairs (required),
//!   e.g. `home.example.com:A,home.example.com:AAAA`
//! - `DISCORD_WEBHOOK_ID` / `DISCORD_WEBHOOK_TOKEN`: webhook credentials
//!   (both or neither; neither disables notifications)
//! - `DNSSYNC_MODE`: `live` (default) or `dry-run`
//! - `DNSSYNC_LOG_LEVEL`: trace, debug, info (default), warn, error
//! - `DNSSYNC_DREAMHOST_API_BASE`, `DNSSYNC_IPV4_URL`, `DNSSYNC_IPV6_URL`:
//!   endpoint overrides

use crate::error::{Error, Result};
use crate::record::{DesiredRecord, RecordType};
use std::collections::HashSet;
use std::fmt;

pub const ENV_API_TOKEN: &str = "DREAMHOST_API_TOKEN";
pub const ENV_TARGET_RECORDS: &str = "TARGET_RECORDS";
pub const ENV_WEBHOOK_ID: &str = "DISCORD_WEBHOOK_ID";
pub const ENV_WEBHOOK_TOKEN: &str = "DISCORD_WEBHOOK_TOKEN";
pub const ENV_MODE: &str = "DNSSYNC_MODE";
pub const ENV_LOG_LEVEL: &str = "DNSSYNC_LOG_LEVEL";
pub const ENV_API_BASE: &str = "DNSSYNC_DREAMHOST_API_BASE";
pub const ENV_IPV4_URL: &str = "DNSSYNC_IPV4_URL";
pub const ENV_IPV6_URL: &str = "DNSSYNC_IPV6_URL";

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Public IP discovery configuration
    pub ip_source: IpSourceConfig,

    /// Notification channel, `None` when notifications are disabled
    pub notifier: Option<NotifierConfig>,

    /// Records to keep in sync, in notification order
    pub records: Vec<DesiredRecord>,

    /// Log level name
    pub log_level: String,
}

impl SyncConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = var(ENV_API_TOKEN).ok_or_else(|| {
            Error::config(format!(
                "{} is required. Set it via: export {}=your_key",
                ENV_API_TOKEN, ENV_API_TOKEN
            ))
        })?;

        let dry_run = match var(ENV_MODE).as_deref().map(str::to_lowercase).as_deref() {
            None | Some("live") => false,
            Some("dry-run") => true,
            Some(other) => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. Valid modes: live, dry-run",
                    ENV_MODE, other
                )));
            }
        };

        let notifier = match (var(ENV_WEBHOOK_ID), var(ENV_WEBHOOK_TOKEN)) {
            (Some(webhook_id), Some(webhook_token)) => Some(NotifierConfig {
                webhook_id,
                webhook_token,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::config(format!(
                    "{} and {} must be set together",
                    ENV_WEBHOOK_ID, ENV_WEBHOOK_TOKEN
                )));
            }
        };

        let records = parse_target_records(&var(ENV_TARGET_RECORDS).unwrap_or_default())?;

        let config = Self {
            provider: ProviderConfig {
                api_token: api_token.trim().to_string(),
                api_base: var(ENV_API_BASE),
                dry_run,
            },
            ip_source: IpSourceConfig {
                ipv4_url: var(ENV_IPV4_URL),
                ipv6_url: var(ENV_IPV6_URL),
            },
            notifier,
            records,
            log_level: var(ENV_LOG_LEVEL).unwrap_or_else(|| "info".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(Error::config(format!(
                "{} must contain at least one record. \
                Set it via: export {}=home.example.com:A",
                ENV_TARGET_RECORDS, ENV_TARGET_RECORDS
            )));
        }

        self.provider.validate()?;
        self.ip_source.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "{} '{}' is not valid. \
                    Valid levels: trace, debug, info, warn, error",
                    ENV_LOG_LEVEL, self.log_level
                )));
            }
        }

        Ok(())
    }
}

/// DreamHost provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// DreamHost API key
    /// ⚠️ NEVER log this value
    pub api_token: String,

    /// API base URL override
    pub api_base: Option<String>,

    /// Perform listings but skip add/remove calls
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(Error::config("DreamHost API token cannot be empty"));
        }

        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_key")
            || token_lower.contains("replace_me")
            || token_lower == "token"
        {
            return Err(Error::config(format!(
                "{} appears to be a placeholder. \
                Use an actual API key from the DreamHost panel.",
                ENV_API_TOKEN
            )));
        }

        if let Some(base) = &self.api_base {
            validate_url(ENV_API_BASE, base)?;
        }

        Ok(())
    }
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Public IP discovery configuration
#[derive(Debug, Clone, Default)]
pub struct IpSourceConfig {
    /// IPv4 echo endpoint override
    pub ipv4_url: Option<String>,

    /// IPv6-capable echo endpoint override
    pub ipv6_url: Option<String>,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.ipv4_url {
            validate_url(ENV_IPV4_URL, url)?;
        }
        if let Some(url) = &self.ipv6_url {
            validate_url(ENV_IPV6_URL, url)?;
        }
        Ok(())
    }
}

/// Discord webhook configuration
#[derive(Clone)]
pub struct NotifierConfig {
    /// Webhook id
    pub webhook_id: String,

    /// Webhook token
    /// ⚠️ NEVER log this value
    pub webhook_token: String,
}

impl fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("webhook_id", &self.webhook_id)
            .field("webhook_token", &"<REDACTED>")
            .finish()
    }
}

/// Parse a `TARGET_RECORDS` value
///
/// Entries are separated by `,`; each is `name:type`. Empty entries are
/// skipped and repeated (name, type) pairs are collapsed, keeping the first.
pub fn parse_target_records(raw: &str) -> Result<Vec<DesiredRecord>> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, record_type) = entry.split_once(':').ok_or_else(|| {
            Error::config(format!(
                "Target record '{}' is missing its type. Expected name:type, e.g. home.example.com:A",
                entry
            ))
        })?;

        let name = normalize_record_name(name);
        validate_record_name(&name)?;
        let record_type: RecordType = record_type.parse()?;

        let record = DesiredRecord::new(name, record_type);
        if seen.insert(record.clone()) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Canonical form of a record name: trimmed, lowercase, no trailing dot
///
/// Applied to configured names and to names listed by the provider alike.
pub fn normalize_record_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

/// Validate that a string is a usable DNS record name
///
/// Basic RFC 1035 checks; a leading `*` label is allowed for wildcards and
/// underscores are allowed for service labels such as `_acme-challenge`.
pub fn validate_record_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::config("Record name cannot be empty"));
    }

    // Total length limit (RFC 1035: 253 chars max)
    if name.len() > 253 {
        return Err(Error::config(format!(
            "Record name too long: {} chars (max 253). Got: {}",
            name.len(),
            name
        )));
    }

    if !name.contains('.') {
        return Err(Error::config(format!(
            "Record name must be fully qualified. Got: '{}'",
            name
        )));
    }

    for (i, label) in name.split('.').enumerate() {
        if label.is_empty() {
            return Err(Error::config(format!("Record name has empty label: '{}'", name)));
        }

        if i == 0 && label == "*" {
            continue;
        }

        if label.len() > 63 {
            return Err(Error::config(format!(
                "Record label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::config(format!(
                "Record label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::config(format!(
                "Record label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn validate_url(var: &str, url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            var, url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_target_records() {
        let records =
            parse_target_records("home.example.com:A, home.example.com:aaaa,,vpn.example.com:A")
                .unwrap();

        assert_eq!(
            records,
            vec![
                DesiredRecord::new("home.example.com", RecordType::A),
                DesiredRecord::new("home.example.com", RecordType::Aaaa),
                DesiredRecord::new("vpn.example.com", RecordType::A),
            ]
        );
    }

    #[test]
    fn test_parse_target_records_collapses_duplicates() {
        let records = parse_target_records("a.example.com:A,A.example.com.:A").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_target_records_missing_type() {
        let err = parse_target_records("home.example.com").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("missing its type"));
    }

    #[test]
    fn test_parse_target_records_rejects_other_types() {
        let err = parse_target_records("home.example.com:CNAME").unwrap_err();
        assert!(err.to_string().contains("Unsupported record type"));
    }

    #[test]
    fn test_underscore_labels_accepted() {
        assert!(validate_record_name("_acme-challenge.example.com").is_ok());
        assert!(validate_record_name("_x.example.com").is_ok());

        let records = parse_target_records("_x.example.com:A").unwrap();
        assert_eq!(records[0].name, "_x.example.com");
    }

    #[test]
    fn test_normalize_record_name() {
        assert_eq!(normalize_record_name(" Home.Example.COM. "), "home.example.com");
        assert_eq!(normalize_record_name("home.example.com"), "home.example.com");
    }

    #[test]
    fn test_validate_record_name() {
        assert!(validate_record_name("home.example.com").is_ok());
        assert!(validate_record_name("*.example.com").is_ok());
        assert!(validate_record_name("localhost").is_err());
        assert!(validate_record_name("bad..example.com").is_err());
        assert!(validate_record_name("-bad.example.com").is_err());
        assert!(validate_record_name("bad name.example.com").is_err());
        assert!(validate_record_name("bad!.example.com").is_err());
        assert!(validate_record_name(&format!("{}.com", "a".repeat(64))).is_err());
    }

    #[test]
    fn test_from_lookup_minimal() {
        let config = SyncConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "ABCDEF123456"),
            (ENV_TARGET_RECORDS, "home.example.com:A"),
        ]))
        .unwrap();

        assert_eq!(config.records.len(), 1);
        assert!(config.notifier.is_none());
        assert!(!config.provider.dry_run);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_from_lookup_full() {
        let config = SyncConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "ABCDEF123456"),
            (ENV_TARGET_RECORDS, "home.example.com:A,home.example.com:AAAA"),
            (ENV_WEBHOOK_ID, "1234"),
            (ENV_WEBHOOK_TOKEN, "secret-webhook"),
            (ENV_MODE, "dry-run"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_IPV4_URL, "http://127.0.0.1:8080/v4"),
        ]))
        .unwrap();

        assert!(config.provider.dry_run);
        assert_eq!(config.records.len(), 2);
        assert_eq!(config.notifier.as_ref().unwrap().webhook_id, "1234");
        assert_eq!(config.ip_source.ipv4_url.as_deref(), Some("http://127.0.0.1:8080/v4"));
        assert_eq!(config.ip_source.ipv6_url, None);
    }

    #[test]
    fn test_from_lookup_missing_token() {
        let err = SyncConfig::from_lookup(lookup(&[(ENV_TARGET_RECORDS, "home.example.com:A")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_API_TOKEN));
    }

    #[test]
    fn test_from_lookup_requires_records() {
        let err =
            SyncConfig::from_lookup(lookup(&[(ENV_API_TOKEN, "ABCDEF123456")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TARGET_RECORDS));
    }

    #[test]
    fn test_from_lookup_half_webhook() {
        let err = SyncConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "ABCDEF123456"),
            (ENV_TARGET_RECORDS, "home.example.com:A"),
            (ENV_WEBHOOK_ID, "1234"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("must be set together"));
    }

    #[test]
    fn test_from_lookup_bad_mode_and_level() {
        let base = [
            (ENV_API_TOKEN, "ABCDEF123456"),
            (ENV_TARGET_RECORDS, "home.example.com:A"),
        ];

        let mut with_mode = base.to_vec();
        with_mode.push((ENV_MODE, "sometimes"));
        assert!(SyncConfig::from_lookup(lookup(&with_mode)).is_err());

        let mut with_level = base.to_vec();
        with_level.push((ENV_LOG_LEVEL, "loud"));
        assert!(SyncConfig::from_lookup(lookup(&with_level)).is_err());
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = SyncConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "your_key"),
            (ENV_TARGET_RECORDS, "home.example.com:A"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_secrets_not_exposed_in_debug() {
        let config = SyncConfig::from_lookup(lookup(&[
            (ENV_API_TOKEN, "SECRETKEY123"),
            (ENV_TARGET_RECORDS, "home.example.com:A"),
            (ENV_WEBHOOK_ID, "1234"),
            (ENV_WEBHOOK_TOKEN, "hook-secret"),
        ]))
        .unwrap();

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("SECRETKEY123"));
        assert!(!debug_str.contains("hook-secret"));
        assert!(debug_str.contains("<REDACTED>"));
    }
}
