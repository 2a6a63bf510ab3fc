use dnsgate_application::use_cases::EvictExpiredQueriesUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 5;

/// Periodically evicts pending queries whose upstream answer never came.
pub struct PendingQuerySweepJob {
    evict: Arc<EvictExpiredQueriesUseCase>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl PendingQuerySweepJob {
    pub fn new(evict: Arc<EvictExpiredQueriesUseCase>) -> Self {
        Self {
            evict,
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting pending query sweep job"
        );

        let mut interval = tokio::time::interval(self.interval);
        // The first tick completes immediately; nothing can have expired yet.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("PendingQuerySweepJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.evict.execute();
                }
            }
        }
    }
}
