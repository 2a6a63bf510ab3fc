use crate::ports::PendingQueryPort;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Drops pending entries whose upstream answer never arrived.
pub struct EvictExpiredQueriesUseCase {
    pending: Arc<dyn PendingQueryPort>,
    max_age: Duration,
}

impl EvictExpiredQueriesUseCase {
    pub fn new(pending: Arc<dyn PendingQueryPort>, max_age: Duration) -> Self {
        Self { pending, max_age }
    }

    pub fn execute(&self) -> usize {
        let evicted = self.pending.evict_expired(self.max_age);
        if evicted > 0 {
            debug!(
                evicted,
                remaining = self.pending.len(),
                max_age_secs = self.max_age.as_secs(),
                "Evicted expired pending queries"
            );
        }
        evicted
    }
}
