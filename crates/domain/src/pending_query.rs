use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// A query forwarded upstream and still waiting for its answer, keyed by the
/// 16-bit transaction id in the pending table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingQuery {
    pub client: SocketAddr,
    pub registered_at: Instant,
}

impl PendingQuery {
    pub fn new(client: SocketAddr) -> Self {
        Self {
            client,
            registered_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        now.saturating_duration_since(self.registered_at) >= max_age
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    /// An in-flight entry with the same id was overwritten.
    Replaced(SocketAddr),
    /// The id was already in flight and the new registration was refused.
    Rejected(SocketAddr),
}

impl RegisterOutcome {
    pub fn is_registered(&self) -> bool {
        !matches!(self, RegisterOutcome::Rejected(_))
    }

    /// The client whose entry this registration displaced, if any.
    pub fn displaced(&self) -> Option<SocketAddr> {
        match self {
            RegisterOutcome::Replaced(previous) => Some(*previous),
            _ => None,
        }
    }
}
