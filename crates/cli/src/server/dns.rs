use crate::di::DnsServices;
use dnsgate_domain::Config;
use dnsgate_infrastructure::dns::{bind_udp_socket, UdpDnsServer, UpstreamRelay};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Bind the client-facing socket and spawn the listener and upstream relay.
pub fn start_dns_server(
    config: &Config,
    services: &DnsServices,
    shutdown: CancellationToken,
) -> anyhow::Result<Vec<JoinHandle<()>>> {
    let socket_addr = config.server.listen_addr()?;
    let socket = Arc::new(bind_udp_socket(socket_addr)?);

    info!(bind_address = %socket_addr, "Starting DNS server");

    let relay = UpstreamRelay::new(
        &services.forwarder,
        socket.clone(),
        services.relay_response.clone(),
    );
    let server = UdpDnsServer::new(socket, services.handle_query.clone());

    Ok(vec![
        tokio::spawn(relay.run(shutdown.clone())),
        tokio::spawn(server.run(shutdown)),
    ])
}
