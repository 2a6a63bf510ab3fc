use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use dnsgate_application::ports::PendingQueryPort;
use dnsgate_domain::{IdCollisionPolicy, PendingQuery, RegisterOutcome};
use rustc_hash::FxBuildHasher;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// In-flight upstream queries keyed by DNS transaction id.
///
/// At most one entry exists per id. What happens when a second query reuses
/// an id that is still in flight is decided by the [`IdCollisionPolicy`].
pub struct PendingQueryTable {
    entries: DashMap<u16, PendingQuery, FxBuildHasher>,
    policy: IdCollisionPolicy,
}

impl PendingQueryTable {
    pub fn new(policy: IdCollisionPolicy) -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            policy,
        }
    }

    pub fn policy(&self) -> IdCollisionPolicy {
        self.policy
    }
}

impl Default for PendingQueryTable {
    fn default() -> Self {
        Self::new(IdCollisionPolicy::default())
    }
}

impl PendingQueryPort for PendingQueryTable {
    fn register(&self, id: u16, client: SocketAddr) -> RegisterOutcome {
        match self.entries.entry(id) {
            Entry::Occupied(mut occupied) => match self.policy {
                IdCollisionPolicy::Overwrite => {
                    let previous = occupied.insert(PendingQuery::new(client));
                    RegisterOutcome::Replaced(previous.client)
                }
                IdCollisionPolicy::Reject => RegisterOutcome::Rejected(occupied.get().client),
            },
            Entry::Vacant(vacant) => {
                vacant.insert(PendingQuery::new(client));
                RegisterOutcome::Inserted
            }
        }
    }

    fn resolve(&self, id: u16) -> Option<SocketAddr> {
        self.entries.remove(&id).map(|(_, pending)| pending.client)
    }

    fn unregister(&self, id: u16, client: SocketAddr, previous: Option<SocketAddr>) -> bool {
        match self.entries.entry(id) {
            Entry::Occupied(mut occupied) if occupied.get().client == client => {
                match previous {
                    // The restored entry ages from now, not from its first registration.
                    Some(previous) => {
                        occupied.insert(PendingQuery::new(previous));
                    }
                    None => {
                        occupied.remove();
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn evict_expired(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.entries.retain(|_, pending| {
            let keep = !pending.is_expired(now, max_age);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_register_then_resolve_removes_entry() {
        let table = PendingQueryTable::default();
        assert_eq!(table.register(7, addr(1000)), RegisterOutcome::Inserted);

        assert_eq!(table.resolve(7), Some(addr(1000)));
        assert_eq!(table.resolve(7), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_overwrite_policy_keeps_latest_client() {
        let table = PendingQueryTable::new(IdCollisionPolicy::Overwrite);
        table.register(7, addr(1000));

        assert_eq!(
            table.register(7, addr(2000)),
            RegisterOutcome::Replaced(addr(1000))
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(7), Some(addr(2000)));
    }

    #[test]
    fn test_reject_policy_keeps_first_client() {
        let table = PendingQueryTable::new(IdCollisionPolicy::Reject);
        assert_eq!(table.policy(), IdCollisionPolicy::Reject);
        table.register(7, addr(1000));

        assert_eq!(
            table.register(7, addr(2000)),
            RegisterOutcome::Rejected(addr(1000))
        );
        assert_eq!(table.resolve(7), Some(addr(1000)));
    }

    #[test]
    fn test_unregister_removes_own_entry() {
        let table = PendingQueryTable::default();
        table.register(7, addr(1000));

        assert!(table.unregister(7, addr(1000), None));
        assert!(table.is_empty());
    }

    #[test]
    fn test_unregister_restores_displaced_client() {
        let table = PendingQueryTable::new(IdCollisionPolicy::Overwrite);
        table.register(7, addr(1000));
        let outcome = table.register(7, addr(2000));

        assert!(table.unregister(7, addr(2000), outcome.displaced()));
        assert_eq!(table.resolve(7), Some(addr(1000)));
    }

    #[test]
    fn test_unregister_leaves_foreign_entry_alone() {
        let table = PendingQueryTable::new(IdCollisionPolicy::Overwrite);
        table.register(7, addr(1000));
        table.register(7, addr(2000));
        table.register(7, addr(3000));

        assert!(!table.unregister(7, addr(2000), Some(addr(1000))));
        assert_eq!(table.resolve(7), Some(addr(3000)));
        assert!(!table.unregister(7, addr(3000), None));
    }

    #[test]
    fn test_evict_expired_zero_age_clears_everything() {
        let table = PendingQueryTable::default();
        table.register(1, addr(1000));
        table.register(2, addr(1001));

        assert_eq!(table.evict_expired(Duration::ZERO), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_evict_expired_keeps_fresh_entries() {
        let table = PendingQueryTable::default();
        table.register(1, addr(1000));

        assert_eq!(table.evict_expired(Duration::from_secs(60)), 0);
        assert_eq!(table.resolve(1), Some(addr(1000)));
    }
}
