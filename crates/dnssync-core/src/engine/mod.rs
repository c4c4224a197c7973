//! Core sync engine
//!
//! The SyncEngine drives one reconciliation run:
//! - Listing the provider's records via RecordStore
//! - Resolving public addresses via IpResolver
//! - Computing actions with [`reconcile`]
//! - Applying them via RecordStore
//! - Reporting via Notifier
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐
//! │ RecordStore │   │  IpResolver  │
//! │   (list)    │   │  (current)   │
//! └─────────────┘   └──────────────┘
//!        │                 │
//!        └───────┬─────────┘
//!                ▼
//!        ┌──────────────┐
//!        │  SyncEngine  │── reconcile()
//!        └──────────────┘
//!                │
//!        ┌───────┴─────────┐
//!        ▼                 ▼
//! ┌─────────────┐   ┌──────────────┐
//! │ RecordStore │   │   Notifier   │
//! │ (add/remove)│   │    (send)    │
//! └─────────────┘   └──────────────┘
//! ```
//!
//! ## Failure handling
//!
//! 1. Listing or address resolution fails → notify, return the error
//! 2. A mutation fails → return the error, no notification
//! 3. Notification fails → log, the run result is unaffected
//!
//! A dry-run store skips mutations. The run reports the actions it would
//! have applied and sends no success notification.
//!
//! Nothing is retried. Rerunning is safe: the next run recomputes from the
//! provider's current records.

use crate::error::{Error, Result};
use crate::reconcile::{Action, reconcile};
use crate::record::{DesiredRecord, PublicAddresses, RecordType};
use crate::traits::{IpResolver, IpVersion, Notifier, RecordStore};
use std::collections::{BTreeSet, HashSet};
use std::net::IpAddr;
use tracing::{debug, error, info, warn};

/// Maximum number of characters of a provider response quoted in a
/// failure notification
pub const RESPONSE_EXCERPT_CHARS: usize = 500;

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Actions applied, in order
    pub applied: Vec<Action>,

    /// The store skipped every mutation; `applied` lists what would have run
    pub dry_run: bool,
}

impl SyncReport {
    /// Whether the run changed anything
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    /// Notification text for the applied actions
    pub fn summary(&self) -> String {
        let mut lines = vec![
            ":white_check_mark: DNS records updated successfully:".to_string(),
            String::new(),
        ];
        lines.extend(self.applied.iter().map(Action::to_markdown));
        lines.join("\n")
    }
}

/// Core sync engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`]
/// 2. Call [`SyncEngine::run_once()`]
///
/// Every call is awaited in turn; the engine never runs two provider
/// calls at once.
pub struct SyncEngine {
    /// Provider holding the records
    store: Box<dyn RecordStore>,

    /// Public address discovery
    resolver: Box<dyn IpResolver>,

    /// Optional notification channel
    notifier: Option<Box<dyn Notifier>>,

    /// Records to keep in sync
    records: Vec<DesiredRecord>,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Parameters
    ///
    /// - `store`: Record store implementation
    /// - `resolver`: IP resolver implementation
    /// - `notifier`: Notifier implementation, `None` to only log
    /// - `records`: Desired records, in notification order
    pub fn new(
        store: Box<dyn RecordStore>,
        resolver: Box<dyn IpResolver>,
        notifier: Option<Box<dyn Notifier>>,
        records: Vec<DesiredRecord>,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::config("No records configured"));
        }

        Ok(Self {
            store,
            resolver,
            notifier,
            records,
        })
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(SyncReport)`: All needed actions applied (possibly none)
    /// - `Err(Error)`: The first failure; later steps were not attempted
    pub async fn run_once(&self) -> Result<SyncReport> {
        info!(
            "Syncing {} record(s) at {}",
            self.records.len(),
            self.store.provider_name()
        );
        for record in &self.records {
            debug!("Target record: {}", record);
        }

        let existing = match self.store.list().await {
            Ok(existing) => existing,
            Err(e) => {
                error!("Could not fetch DNS records: {}", e);
                self.notify(&listing_failure_message(&e)).await;
                return Err(e);
            }
        };
        debug!("Provider holds {} address record(s)", existing.len());

        let addresses = match self.resolve_addresses().await {
            Ok(addresses) => addresses,
            Err(e) => {
                error!("Could not fetch public IP addresses: {}", e);
                self.notify(IP_FAILURE_MESSAGE).await;
                return Err(e);
            }
        };

        let actions = reconcile(&self.records, &existing, &addresses);
        if actions.is_empty() {
            info!("All records up to date");
            return Ok(SyncReport::default());
        }

        // (name, type, address) triples already live at the provider
        let mut live: HashSet<(String, RecordType, IpAddr)> = existing
            .iter()
            .filter_map(|e| {
                let target = addresses.for_type(e.record_type)?;
                e.points_at(target)
                    .then(|| (e.name.clone(), e.record_type, target))
            })
            .collect();

        let mut report = SyncReport {
            applied: Vec::new(),
            dry_run: self.store.is_dry_run(),
        };
        for action in actions {
            self.apply(&action, &mut live).await?;
            if report.dry_run {
                info!("[DRY-RUN] Would apply: {}", action);
            } else {
                info!("{}", action);
            }
            report.applied.push(action);
        }

        // Nothing changed at the provider, so there is nothing to announce
        if report.dry_run {
            info!(
                "[DRY-RUN] {} change(s) not applied, no notification sent",
                report.applied.len()
            );
            return Ok(report);
        }

        self.notify(&report.summary()).await;
        Ok(report)
    }

    /// Resolve the public address of every family a desired record needs
    async fn resolve_addresses(&self) -> Result<PublicAddresses> {
        let versions: BTreeSet<IpVersion> = self
            .records
            .iter()
            .map(|r| r.record_type.ip_version())
            .collect();

        let mut addresses = PublicAddresses::default();
        for version in versions {
            let ip = self.resolver.current(version).await?;
            // Authoritative family check; resolvers may also check their own
            if !version.matches(&ip) {
                return Err(Error::data(format!("Expected {} address, got {}", version, ip)));
            }
            info!("Public {} address: {}", version, ip);
            addresses.set(ip);
        }

        Ok(addresses)
    }

    /// Apply a single action against the record store
    ///
    /// A replace whose new value is already live (several stale duplicates
    /// of one record) only removes; the provider rejects a second add of
    /// the same value.
    async fn apply(
        &self,
        action: &Action,
        live: &mut HashSet<(String, RecordType, IpAddr)>,
    ) -> Result<()> {
        match action {
            Action::Add {
                name,
                record_type,
                value,
            } => {
                self.store
                    .add(name, *record_type, &value.to_string())
                    .await?;
                live.insert((name.clone(), *record_type, *value));
                Ok(())
            }
            Action::Replace {
                name,
                record_type,
                old_value,
                new_value,
            } => {
                self.store.remove(name, *record_type, old_value).await?;

                let key = (name.clone(), *record_type, *new_value);
                if live.contains(&key) {
                    debug!("{} ({}) already has {}, skipping add", name, record_type, new_value);
                    return Ok(());
                }

                if let Err(e) = self
                    .store
                    .add(name, *record_type, &new_value.to_string())
                    .await
                {
                    error!(
                        "Removed {} ({}) value {} but adding {} failed; \
                        the record is absent until the next run",
                        name, record_type, old_value, new_value
                    );
                    return Err(Error::ReplaceInterrupted {
                        name: name.clone(),
                        record_type: *record_type,
                        source: Box::new(e),
                    });
                }

                live.insert(key);
                Ok(())
            }
        }
    }

    /// Best-effort notification
    async fn notify(&self, message: &str) {
        let Some(notifier) = &self.notifier else {
            debug!("Notifications disabled, not sending: {}", message);
            return;
        };

        match notifier.send(message).await {
            Ok(()) => info!("{} notification sent", notifier.channel_name()),
            Err(e) => warn!(
                "Failed to send {} notification: {}",
                notifier.channel_name(),
                e
            ),
        }
    }
}

/// Message sent when public address resolution fails
pub const IP_FAILURE_MESSAGE: &str = ":red_circle: There was an issue fetching public IP addresses.";

/// Message sent when the record listing fails
pub fn listing_failure_message(error: &Error) -> String {
    let excerpt: String = error.detail().chars().take(RESPONSE_EXCERPT_CHARS).collect();
    [
        ":red_circle: There was an issue fetching DNS records.",
        "Response:",
        "```json",
        excerpt.as_str(),
        "```",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_format() {
        let report = SyncReport {
            applied: vec![Action::Add {
                name: "h.example.com".to_string(),
                record_type: RecordType::A,
                value: IpAddr::from([1, 2, 3, 4]),
            }],
            dry_run: false,
        };

        assert_eq!(
            report.summary(),
            ":white_check_mark: DNS records updated successfully:\n\n\
             :green_circle: Added `h.example.com` (`A`): `1.2.3.4`"
        );
        assert!(!report.is_noop());
        assert!(SyncReport::default().is_noop());
    }

    #[test]
    fn test_listing_failure_message_truncates() {
        let body = format!(r#"{{"result":"error","data":"{}"}}"#, "x".repeat(1000));
        let message = listing_failure_message(&Error::provider("dreamhost", body));

        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines[0], ":red_circle: There was an issue fetching DNS records.");
        assert_eq!(lines[1], "Response:");
        assert_eq!(lines[2], "```json");
        assert_eq!(lines[3].chars().count(), RESPONSE_EXCERPT_CHARS);
        assert!(lines[3].starts_with(r#"{"result":"error""#));
        assert_eq!(lines[4], "```");
    }
}
