//! Test doubles and common utilities for contract tests
//!
//! In-memory stand-ins for the provider, the IP echo service and the chat
//! channel. Each records the calls made against it.

#![allow(dead_code)]

use async_trait::async_trait;
use dnssync_core::error::{Error, Result};
use dnssync_core::traits::{IpResolver, IpVersion, Notifier, RecordStore};
use dnssync_core::{DesiredRecord, ExistingRecord, RecordType};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// A provider call, as observed by [`MemoryRecordStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List,
    Add(String, RecordType, String),
    Remove(String, RecordType, String),
}

/// Which store operation should fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    Nothing,
    List,
    /// Fail every add of this value
    AddValue(String),
    /// Fail every remove of this value
    RemoveValue(String),
}

/// An in-memory record store that applies adds and removes to its records
#[derive(Clone)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<Vec<ExistingRecord>>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    fail_on: Arc<Mutex<FailOn>>,
    dry_run: bool,
}

impl MemoryRecordStore {
    pub fn new(records: Vec<ExistingRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: Arc::new(Mutex::new(FailOn::Nothing)),
            dry_run: false,
        }
    }

    /// A store that records calls but never changes its records
    pub fn dry_run(records: Vec<ExistingRecord>) -> Self {
        Self {
            dry_run: true,
            ..Self::new(records)
        }
    }

    pub fn fail_on(&self, fail_on: FailOn) {
        *self.fail_on.lock().unwrap() = fail_on;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than `list`
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != StoreCall::List)
            .collect()
    }

    pub fn records(&self) -> Vec<ExistingRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self) -> Result<Vec<ExistingRecord>> {
        self.calls.lock().unwrap().push(StoreCall::List);
        if *self.fail_on.lock().unwrap() == FailOn::List {
            return Err(Error::provider(
                "memory",
                r#"{"data":"invalid_api_key","result":"error"}"#,
            ));
        }
        Ok(self.records())
    }

    async fn add(&self, name: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Add(name.to_string(), record_type, value.to_string()));
        if *self.fail_on.lock().unwrap() == FailOn::AddValue(value.to_string()) {
            return Err(Error::transport("HTTP 503 Service Unavailable"));
        }
        if self.dry_run {
            return Ok(());
        }
        self.records
            .lock()
            .unwrap()
            .push(ExistingRecord::new(name, record_type, value));
        Ok(())
    }

    async fn remove(&self, name: &str, record_type: RecordType, value: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::Remove(name.to_string(), record_type, value.to_string()));
        if *self.fail_on.lock().unwrap() == FailOn::RemoveValue(value.to_string()) {
            return Err(Error::transport("HTTP 503 Service Unavailable"));
        }
        if self.dry_run {
            return Ok(());
        }
        self.records
            .lock()
            .unwrap()
            .retain(|r| !(r.name == name && r.record_type == record_type && r.value == value));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// An IP resolver answering from fixed addresses
#[derive(Clone)]
pub struct FixedIpResolver {
    ipv4: Option<IpAddr>,
    ipv6: Option<IpAddr>,
    calls: Arc<Mutex<Vec<IpVersion>>>,
}

impl FixedIpResolver {
    pub fn new(ipv4: Option<&str>, ipv6: Option<&str>) -> Self {
        Self {
            ipv4: ipv4.map(|ip| ip.parse().unwrap()),
            ipv6: ipv6.map(|ip| ip.parse().unwrap()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<IpVersion> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IpResolver for FixedIpResolver {
    async fn current(&self, version: IpVersion) -> Result<IpAddr> {
        self.calls.lock().unwrap().push(version);
        let ip = match version {
            IpVersion::V4 => self.ipv4,
            IpVersion::V6 => self.ipv6,
        };
        ip.ok_or_else(|| Error::transport(format!("no {} route", version)))
    }
}

/// A notifier that keeps every message, optionally failing each send
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            messages: Arc::default(),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        self.messages.lock().unwrap().push(message.to_string());
        if self.fail {
            return Err(Error::transport("webhook returned 500"));
        }
        Ok(())
    }

    fn channel_name(&self) -> &'static str {
        "recording"
    }
}

pub fn desired(name: &str, record_type: RecordType) -> DesiredRecord {
    DesiredRecord::new(name, record_type)
}

pub fn existing(name: &str, record_type: RecordType, value: &str) -> ExistingRecord {
    ExistingRecord::new(name, record_type, value)
}
