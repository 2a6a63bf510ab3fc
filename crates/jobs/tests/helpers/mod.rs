#![allow(dead_code)]

use dnsgate_application::ports::PendingQueryPort;
use dnsgate_domain::RegisterOutcome;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Pending table that only counts sweeps and reports a fixed eviction count.
#[derive(Default)]
pub struct CountingPendingTable {
    sweeps: AtomicUsize,
    evict_per_sweep: usize,
}

impl CountingPendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evicting(evict_per_sweep: usize) -> Self {
        Self {
            sweeps: AtomicUsize::new(0),
            evict_per_sweep,
        }
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps.load(Ordering::SeqCst)
    }
}

impl PendingQueryPort for CountingPendingTable {
    fn register(&self, _id: u16, _client: SocketAddr) -> RegisterOutcome {
        RegisterOutcome::Inserted
    }

    fn resolve(&self, _id: u16) -> Option<SocketAddr> {
        None
    }

    fn unregister(&self, _id: u16, _client: SocketAddr, _previous: Option<SocketAddr>) -> bool {
        false
    }

    fn evict_expired(&self, _max_age: Duration) -> usize {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        self.evict_per_sweep
    }

    fn len(&self) -> usize {
        0
    }
}
