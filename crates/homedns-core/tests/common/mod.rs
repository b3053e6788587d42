//! Test doubles for the sync flow tests
//!
//! Minimal mock implementations of the `IpSource` and `DnsProvider` traits
//! that record their calls so tests can assert on what the flow did.

use homedns_core::error::{Error, Result};
use homedns_core::provider::{DnsProvider, DnsRecord};
use homedns_core::IpSource;
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An IpSource that returns a fixed address (or a fixed error)
pub struct FixedIpSource {
    ip: Option<Ipv4Addr>,
    /// Call counter for current()
    current_call_count: AtomicUsize,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip: Some(ip),
            current_call_count: AtomicUsize::new(0),
        }
    }

    /// A source whose every call fails, as if the echo service were down
    pub fn failing() -> Self {
        Self {
            ip: None,
            current_call_count: AtomicUsize::new(0),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        self.ip
            .ok_or_else(|| Error::ip_echo("echo service unreachable"))
    }
}

/// A mock DnsProvider serving one record and tracking calls
pub struct MockDnsProvider {
    record: DnsRecord,
    fail_put: bool,
    /// Call counter for fetch_record()
    fetch_call_count: AtomicUsize,
    /// Recorded (record, new_ip) pairs from put calls
    puts: Mutex<Vec<(DnsRecord, Ipv4Addr)>>,
}

impl MockDnsProvider {
    pub fn new(record: DnsRecord) -> Self {
        Self {
            record,
            fail_put: false,
            fetch_call_count: AtomicUsize::new(0),
            puts: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose put always fails, as if the API rejected the write
    pub fn with_failing_put(record: DnsRecord) -> Self {
        Self {
            fail_put: true,
            ..Self::new(record)
        }
    }

    /// Get the number of times fetch_record() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times put_record() was called
    pub fn put_call_count(&self) -> usize {
        self.puts.lock().unwrap().len()
    }

    /// Get the recorded put calls
    pub fn puts(&self) -> Vec<(DnsRecord, Ipv4Addr)> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn fetch_record(&self, _host_name: &str) -> Result<DnsRecord> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.record.clone())
    }

    async fn put_record(&self, record: &DnsRecord, new_ip: Ipv4Addr) -> Result<()> {
        self.puts.lock().unwrap().push((record.clone(), new_ip));
        if self.fail_put {
            return Err(Error::api("record update: request failed"));
        }
        Ok(())
    }
}

/// Helper to build a record for testing
pub fn a_record(content: &str, proxied: bool) -> DnsRecord {
    DnsRecord {
        id: "372e67954025e0ba6aaa6d586b9e0b59".to_string(),
        name: "home.example.com".to_string(),
        record_type: "A".to_string(),
        content: content.to_string(),
        proxied,
    }
}
