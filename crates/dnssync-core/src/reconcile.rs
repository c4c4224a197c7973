//! Desired-vs-existing reconciliation
//!
//! [`reconcile`] is a pure function: it computes the actions needed to make
//! the provider's records match the desired list, and performs no I/O.
//!
//! ## Rules
//!
//! For each desired record, in input order:
//!
//! 1. Target address = public IPv4 for `A`, public IPv6 for `AAAA`
//! 2. No existing record with the same name and type → [`Action::Add`]
//! 3. One [`Action::Replace`] per existing match whose value differs
//! 4. Matches already pointing at the target produce nothing
//!
//! A `Replace` is applied as remove-then-add. The provider has no atomic
//! update, so a failure between the two steps leaves the record absent until
//! the next run (see [`crate::Error::ReplaceInterrupted`]).

use crate::record::{DesiredRecord, ExistingRecord, PublicAddresses, RecordType};
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, warn};

/// A single change to apply at the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a record that does not exist yet
    Add {
        name: String,
        record_type: RecordType,
        value: IpAddr,
    },

    /// Swap a stale value for the current address
    Replace {
        name: String,
        record_type: RecordType,
        old_value: String,
        new_value: IpAddr,
    },
}

impl Action {
    /// Record name this action touches
    pub fn name(&self) -> &str {
        match self {
            Action::Add { name, .. } | Action::Replace { name, .. } => name,
        }
    }

    /// Record type this action touches
    pub fn record_type(&self) -> RecordType {
        match self {
            Action::Add { record_type, .. } | Action::Replace { record_type, .. } => *record_type,
        }
    }

    /// One notification line, with Discord markup
    pub fn to_markdown(&self) -> String {
        match self {
            Action::Add {
                name,
                record_type,
                value,
            } => format!(
                ":green_circle: Added `{}` (`{}`): `{}`",
                name, record_type, value
            ),
            Action::Replace {
                name,
                record_type,
                old_value,
                new_value,
            } => format!(
                ":yellow_circle: Updated `{}` (`{}`): `{}` -> `{}`",
                name, record_type, old_value, new_value
            ),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Add {
                name,
                record_type,
                value,
            } => write!(f, "Added {} ({}): {}", name, record_type, value),
            Action::Replace {
                name,
                record_type,
                old_value,
                new_value,
            } => write!(
                f,
                "Updated {} ({}): {} -> {}",
                name, record_type, old_value, new_value
            ),
        }
    }
}

/// Compute the actions that bring `existing` in line with `desired`
///
/// Desired records whose family is missing from `addresses` are skipped.
pub fn reconcile(
    desired: &[DesiredRecord],
    existing: &[ExistingRecord],
    addresses: &PublicAddresses,
) -> Vec<Action> {
    let mut actions = Vec::new();

    for record in desired {
        let Some(target) = addresses.for_type(record.record_type) else {
            warn!(
                "No public {} address available, skipping {}",
                record.record_type.ip_version(),
                record
            );
            continue;
        };

        let matches: Vec<&ExistingRecord> = existing
            .iter()
            .filter(|e| e.name == record.name && e.record_type == record.record_type)
            .collect();

        if matches.is_empty() {
            actions.push(Action::Add {
                name: record.name.clone(),
                record_type: record.record_type,
                value: target,
            });
            continue;
        }

        for stale in matches.into_iter().filter(|e| !e.points_at(target)) {
            actions.push(Action::Replace {
                name: record.name.clone(),
                record_type: record.record_type,
                old_value: stale.value.clone(),
                new_value: target,
            });
        }
    }

    debug!("Reconciled {} desired record(s) into {} action(s)", desired.len(), actions.len());
    actions
}
