use async_trait::async_trait;
use dnsgate_application::ports::UpstreamPort;
use dnsgate_application::use_cases::RelayUpstreamResponseUseCase;
use dnsgate_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::server::MAX_DATAGRAM_SIZE;

/// Sends client queries, byte for byte, to the single upstream resolver.
///
/// All queries share one ephemeral socket; answers come back on it and are
/// drained by [`UpstreamRelay`].
pub struct UpstreamForwarder {
    socket: Arc<UdpSocket>,
    upstream: SocketAddr,
}

impl UpstreamForwarder {
    pub fn new(socket: Arc<UdpSocket>, upstream: SocketAddr) -> Self {
        Self { socket, upstream }
    }

    /// Bind an ephemeral socket matching the upstream's address family.
    pub async fn bind(upstream: SocketAddr) -> Result<Self, DomainError> {
        let bind_addr = if upstream.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainError::IoError(format!("Failed to bind upstream UDP socket: {}", e))
        })?;

        Ok(Self::new(Arc::new(socket), upstream))
    }

    pub fn socket(&self) -> Arc<UdpSocket> {
        self.socket.clone()
    }

    pub fn upstream_addr(&self) -> SocketAddr {
        self.upstream
    }
}

#[async_trait]
impl UpstreamPort for UpstreamForwarder {
    async fn forward(&self, query: &[u8]) -> Result<(), DomainError> {
        self.socket
            .send_to(query, self.upstream)
            .await
            .map_err(|e| DomainError::UpstreamSendFailed {
                server: self.upstream.to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    fn upstream_name(&self) -> String {
        self.upstream.to_string()
    }
}

/// Receives upstream answers and relays the raw bytes to the client that
/// asked, using the listener socket so the reply comes from the proxy port.
pub struct UpstreamRelay {
    upstream_socket: Arc<UdpSocket>,
    client_socket: Arc<UdpSocket>,
    upstream: SocketAddr,
    use_case: Arc<RelayUpstreamResponseUseCase>,
}

impl UpstreamRelay {
    pub fn new(
        forwarder: &UpstreamForwarder,
        client_socket: Arc<UdpSocket>,
        use_case: Arc<RelayUpstreamResponseUseCase>,
    ) -> Self {
        Self {
            upstream_socket: forwarder.socket(),
            client_socket,
            upstream: forwarder.upstream_addr(),
            use_case,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        info!(upstream = %self.upstream, "Upstream relay started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Upstream relay: shutting down");
                    break;
                }
                result = self.upstream_socket.recv_from(&mut buf) => {
                    match result {
                        Ok((len, from)) => self.relay(&buf[..len], from).await,
                        Err(e) => {
                            // ICMP port unreachable surfaces here on some platforms.
                            warn!(error = %e, "Upstream socket receive error");
                        }
                    }
                }
            }
        }
    }

    async fn relay(&self, response: &[u8], from: SocketAddr) {
        if from != self.upstream {
            debug!(from = %from, "Ignoring datagram from non-upstream source");
            return;
        }

        let Some(client) = self.use_case.execute(response) else {
            return;
        };

        if let Err(e) = self.client_socket.send_to(response, client).await {
            error!(client = %client, error = %e, "Failed to relay upstream response");
        }
    }
}
