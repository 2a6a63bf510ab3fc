use dnsgate_application::use_cases::{HandleDnsQueryUseCase, QueryOutcome};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Largest datagram read from either socket: the UDP payload limit, so
/// nothing is cut short on receive.
pub const MAX_DATAGRAM_SIZE: usize = 65535;

pub fn bind_udp_socket(socket_addr: SocketAddr) -> io::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

/// Client-facing UDP listener. Each datagram is handled on its own task so a
/// slow upstream send never stalls the receive loop.
pub struct UdpDnsServer {
    socket: Arc<UdpSocket>,
    handler: Arc<HandleDnsQueryUseCase>,
}

impl UdpDnsServer {
    pub fn new(socket: Arc<UdpSocket>, handler: Arc<HandleDnsQueryUseCase>) -> Self {
        Self { socket, handler }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut recv_buf = vec![0u8; MAX_DATAGRAM_SIZE];

        if let Ok(addr) = self.socket.local_addr() {
            info!(bind_address = %addr, "DNS listener ready");
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("DNS listener: shutting down");
                    break;
                }
                result = self.socket.recv_from(&mut recv_buf) => {
                    match result {
                        Ok((n, from)) => {
                            let payload: Arc<[u8]> = Arc::from(&recv_buf[..n]);
                            let handler = self.handler.clone();
                            let socket = self.socket.clone();
                            tokio::spawn(async move {
                                if let QueryOutcome::Answered(response) =
                                    handler.execute(&payload, from).await
                                {
                                    if let Err(e) = socket.send_to(&response, from).await {
                                        error!(client = %from, error = %e, "Failed to send DNS response");
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "UDP recv error");
                        }
                    }
                }
            }
        }
    }
}
