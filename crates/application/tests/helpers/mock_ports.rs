#![allow(dead_code)]

use async_trait::async_trait;
use dnsgate_application::ports::{
    BlocklistMembershipPort, DnsCodec, PendingQueryPort, UpstreamPort,
};
use dnsgate_domain::{
    ControlCommand, DnsMessage, DnsQuestion, DomainError, RegisterOutcome, QCLASS_IN, QTYPE_A,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

/// Decodes only payloads registered up front; encodes by recording the
/// message and returning a marker that carries the id.
#[derive(Default)]
pub struct MockDnsCodec {
    decodable: RwLock<HashMap<Vec<u8>, DnsMessage>>,
    encoded: Mutex<Vec<DnsMessage>>,
    fail_encode: AtomicBool,
}

impl MockDnsCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, bytes: &[u8], message: DnsMessage) {
        self.decodable
            .write()
            .unwrap()
            .insert(bytes.to_vec(), message);
    }

    /// Registers a single-question A query and returns its payload bytes.
    pub fn register_query(&self, id: u16, domain: &str) -> Vec<u8> {
        let mut bytes = id.to_be_bytes().to_vec();
        bytes.extend_from_slice(domain.as_bytes());
        self.register(
            &bytes,
            DnsMessage::query(id, DnsQuestion::new(domain, QTYPE_A, QCLASS_IN)),
        );
        bytes
    }

    pub fn set_fail_encode(&self, fail: bool) {
        self.fail_encode.store(fail, Ordering::SeqCst);
    }

    pub fn encoded(&self) -> Vec<DnsMessage> {
        self.encoded.lock().unwrap().clone()
    }

    pub fn last_encoded(&self) -> Option<DnsMessage> {
        self.encoded.lock().unwrap().last().cloned()
    }

    pub fn marker(id: u16) -> Vec<u8> {
        format!("encoded:{}", id).into_bytes()
    }
}

impl DnsCodec for MockDnsCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DnsMessage, DomainError> {
        self.decodable
            .read()
            .unwrap()
            .get(bytes)
            .cloned()
            .ok_or_else(|| DomainError::InvalidDnsMessage("unregistered payload".to_string()))
    }

    fn encode(&self, message: &DnsMessage) -> Result<Vec<u8>, DomainError> {
        if self.fail_encode.load(Ordering::SeqCst) {
            return Err(DomainError::EncodeFailed("mock failure".to_string()));
        }
        self.encoded.lock().unwrap().push(message.clone());
        Ok(Self::marker(message.id))
    }
}

#[derive(Default)]
pub struct MockBlocklist {
    blocked: RwLock<HashSet<String>>,
    checked: Mutex<Vec<String>>,
    applied: Mutex<Vec<ControlCommand>>,
}

impl MockBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_domain(&self, domain: &str) {
        self.blocked.write().unwrap().insert(domain.to_string());
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }

    pub fn applied(&self) -> Vec<ControlCommand> {
        self.applied.lock().unwrap().clone()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.blocked.read().unwrap().contains(domain)
    }
}

impl BlocklistMembershipPort for MockBlocklist {
    fn is_blocked(&self, domain: &str) -> bool {
        self.checked.lock().unwrap().push(domain.to_string());
        self.blocked.read().unwrap().contains(domain)
    }

    fn apply_command(&self, command: &ControlCommand) {
        self.applied.lock().unwrap().push(command.clone());
        let mut blocked = self.blocked.write().unwrap();
        match command {
            ControlCommand::Sync { domains } => {
                *blocked = domains.iter().map(|d| d.to_lowercase()).collect();
            }
            ControlCommand::Add { domain } => {
                blocked.insert(domain.to_lowercase());
            }
            ControlCommand::Remove { domain } => {
                blocked.remove(&domain.to_lowercase());
            }
        }
    }

    fn override_count(&self) -> usize {
        self.blocked.read().unwrap().len()
    }

    fn filter_count(&self) -> usize {
        0
    }
}

#[derive(Default)]
pub struct MockPendingTable {
    entries: Mutex<HashMap<u16, SocketAddr>>,
    reject_collisions: AtomicBool,
    evict_calls: Mutex<Vec<Duration>>,
}

impl MockPendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        let table = Self::default();
        table.reject_collisions.store(true, Ordering::SeqCst);
        table
    }

    pub fn get(&self, id: u16) -> Option<SocketAddr> {
        self.entries.lock().unwrap().get(&id).copied()
    }

    pub fn evict_calls(&self) -> Vec<Duration> {
        self.evict_calls.lock().unwrap().clone()
    }
}

impl PendingQueryPort for MockPendingTable {
    fn register(&self, id: u16, client: SocketAddr) -> RegisterOutcome {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(&id).copied() {
            Some(existing) if self.reject_collisions.load(Ordering::SeqCst) => {
                RegisterOutcome::Rejected(existing)
            }
            Some(previous) => {
                entries.insert(id, client);
                RegisterOutcome::Replaced(previous)
            }
            None => {
                entries.insert(id, client);
                RegisterOutcome::Inserted
            }
        }
    }

    fn resolve(&self, id: u16) -> Option<SocketAddr> {
        self.entries.lock().unwrap().remove(&id)
    }

    fn unregister(&self, id: u16, client: SocketAddr, previous: Option<SocketAddr>) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.get(&id) != Some(&client) {
            return false;
        }
        match previous {
            Some(previous) => entries.insert(id, previous),
            None => entries.remove(&id),
        };
        true
    }

    fn evict_expired(&self, max_age: Duration) -> usize {
        self.evict_calls.lock().unwrap().push(max_age);
        let mut entries = self.entries.lock().unwrap();
        let count = entries.len();
        entries.clear();
        count
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[derive(Default)]
pub struct MockUpstream {
    forwarded: Mutex<Vec<Vec<u8>>>,
    should_fail: AtomicBool,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn forwarded(&self) -> Vec<Vec<u8>> {
        self.forwarded.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamPort for MockUpstream {
    async fn forward(&self, query: &[u8]) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::UpstreamSendFailed {
                server: self.upstream_name(),
                reason: "network unreachable".to_string(),
            });
        }
        self.forwarded.lock().unwrap().push(query.to_vec());
        Ok(())
    }

    fn upstream_name(&self) -> String {
        "mock-upstream:53".to_string()
    }
}
