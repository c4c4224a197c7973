// # Record Store Trait
//
// Defines the interface to the DNS provider holding the authoritative records.
//
// ## Implementations
//
// - DreamHost: `dnssync-provider-dreamhost` crate
//
// ## Usage
//
// ```rust,ignore
// use dnssync_core::{RecordStore, RecordType};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* RecordStore implementation */;
//
//     for record in store.list().await? {
//         println!("{} {} {}", record.name, record.record_type, record.value);
//     }
//
//     store.add("home.example.com", RecordType::A, "1.2.3.4").await?;
//
//     Ok(())
// }
// ```

use crate::record::{ExistingRecord, RecordType};
use async_trait::async_trait;

/// Trait for DNS record store implementations
///
/// Each method is a single provider call. Implementations must not retry,
/// cache between calls, or decide whether a change is needed: the
/// reconciler owns those decisions.
///
/// # Failure
///
/// Network failures and non-2xx responses are reported as
/// [`crate::Error::Transport`], unexpected bodies as [`crate::Error::Data`],
/// and provider-reported failures as [`crate::Error::Provider`].
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List the provider's address records
    ///
    /// Only `A` and `AAAA` records are returned; other record types held
    /// by the provider are dropped. Names are returned in the form produced
    /// by [`crate::config::normalize_record_name`].
    async fn list(&self) -> Result<Vec<ExistingRecord>, crate::Error>;

    /// Add a record
    ///
    /// # Parameters
    ///
    /// - `name`: The DNS record name (e.g., "home.example.com")
    /// - `record_type`: `A` or `AAAA`
    /// - `value`: The record value (an IP literal)
    async fn add(&self, name: &str, record_type: RecordType, value: &str)
    -> Result<(), crate::Error>;

    /// Remove a record
    ///
    /// The (name, type, value) triple identifies exactly one stored entry.
    async fn remove(
        &self,
        name: &str,
        record_type: RecordType,
        value: &str,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Whether `add` and `remove` are logged instead of sent
    fn is_dry_run(&self) -> bool {
        false
    }
}
