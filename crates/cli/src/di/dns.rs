use dnsgate_application::ports::{BlocklistMembershipPort, DnsCodec, PendingQueryPort};
use dnsgate_application::use_cases::{
    EvictExpiredQueriesUseCase, HandleDnsQueryUseCase, RelayUpstreamResponseUseCase,
};
use dnsgate_domain::Config;
use dnsgate_infrastructure::blocklist::BlocklistMembership;
use dnsgate_infrastructure::dns::{HickoryDnsCodec, PendingQueryTable, UpstreamForwarder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct DnsServices {
    pub blocklist: Arc<BlocklistMembership>,
    pub forwarder: Arc<UpstreamForwarder>,
    pub handle_query: Arc<HandleDnsQueryUseCase>,
    pub relay_response: Arc<RelayUpstreamResponseUseCase>,
    pub evict_expired: Arc<EvictExpiredQueriesUseCase>,
}

impl DnsServices {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        info!("Initializing DNS services");

        let codec: Arc<dyn DnsCodec> = Arc::new(HickoryDnsCodec::new());
        let blocklist = Self::build_blocklist(config);
        let table = Arc::new(PendingQueryTable::new(config.upstream.id_collision));
        let id_collision = table.policy();
        let pending: Arc<dyn PendingQueryPort> = table;

        let upstream_addr = config.upstream_addr()?;
        let forwarder = Arc::new(UpstreamForwarder::bind(upstream_addr).await?);
        info!(
            upstream = %upstream_addr,
            id_collision = id_collision.as_str(),
            "Upstream forwarder ready"
        );

        let handle_query = Arc::new(HandleDnsQueryUseCase::new(
            codec.clone(),
            blocklist.clone(),
            pending.clone(),
            forwarder.clone(),
            config.admin.clone(),
        ));
        let relay_response = Arc::new(RelayUpstreamResponseUseCase::new(codec, pending.clone()));
        let evict_expired = Arc::new(EvictExpiredQueriesUseCase::new(
            pending,
            Duration::from_secs(config.upstream.pending_timeout_secs),
        ));

        Ok(Self {
            blocklist,
            forwarder,
            handle_query,
            relay_response,
            evict_expired,
        })
    }

    fn build_blocklist(config: &Config) -> Arc<BlocklistMembership> {
        let blocklist = Arc::new(BlocklistMembership::from_config(&config.blocking));
        let path = Path::new(&config.blocking.blocklist_path);

        if let Err(e) = blocklist.load_from_file(path) {
            warn!(error = %e, "Blocklist unavailable, starting with an empty filter");
        }

        info!(
            filter_entries = blocklist.filter_count(),
            admin_hostname = %config.admin.hostname,
            "Blocklist ready"
        );
        blocklist
    }
}
