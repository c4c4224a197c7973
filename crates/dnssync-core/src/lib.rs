// # dnssync-core
//
// Core library for the dnssync record reconciler.
//
// ## Architecture Overview
//
// dnssync keeps a handful of A/AAAA records at a DNS provider pointed at
// this host's public addresses. This library holds everything that is not
// provider- or transport-specific:
// - **RecordStore**: Trait for listing, adding and removing provider records
// - **IpResolver**: Trait for discovering the public IPv4/IPv6 address
// - **Notifier**: Trait for posting run results to a chat channel
// - **reconcile**: Pure desired-vs-existing diff producing [`Action`]s
// - **SyncEngine**: Drives one list → resolve → reconcile → apply → notify run
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation is pure; I/O lives behind traits
// 2. **Single Pass**: One sequential run, no background tasks, no retries
// 3. **Stateless**: Every run recomputes from the provider's current records
// 4. **Explicit Configuration**: One `SyncConfig` built at startup, passed down

pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{IpSourceConfig, NotifierConfig, ProviderConfig, SyncConfig};
pub use engine::{SyncEngine, SyncReport};
pub use error::{Error, Result};
pub use reconcile::{Action, reconcile};
pub use record::{DesiredRecord, ExistingRecord, PublicAddresses, RecordType};
pub use traits::{IpResolver, IpVersion, Notifier, RecordStore};
