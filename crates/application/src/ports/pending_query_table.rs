use dnsgate_domain::RegisterOutcome;
use std::net::SocketAddr;
use std::time::Duration;

/// Correlates queries forwarded upstream with the client that sent them.
pub trait PendingQueryPort: Send + Sync {
    fn register(&self, id: u16, client: SocketAddr) -> RegisterOutcome;

    /// Lookup-and-remove. `None` when the id is not in flight.
    fn resolve(&self, id: u16) -> Option<SocketAddr>;

    /// Undo a registration by `client`. When the entry for `id` still belongs
    /// to `client` it is put back to `previous`, or removed when there was
    /// none. An entry owned by anyone else is left alone. Returns whether the
    /// table changed.
    fn unregister(&self, id: u16, client: SocketAddr, previous: Option<SocketAddr>) -> bool;

    /// Removes entries registered at least `max_age` ago and returns how many went.
    fn evict_expired(&self, max_age: Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
