//! Core traits for dnssync
//!
//! This module defines the abstract interfaces to the outside world.
//!
//! - [`RecordStore`]: List, add and remove provider DNS records
//! - [`IpResolver`]: Discover this host's public addresses
//! - [`Notifier`]: Post run results to a chat channel

pub mod ip_resolver;
pub mod notifier;
pub mod record_store;

pub use ip_resolver::{IpResolver, IpVersion};
pub use notifier::Notifier;
pub use record_store::RecordStore;
