pub mod codec;
pub mod forwarder;
pub mod pending;
pub mod server;

pub use codec::HickoryDnsCodec;
pub use forwarder::{UpstreamForwarder, UpstreamRelay};
pub use pending::PendingQueryTable;
pub use server::{bind_udp_socket, UdpDnsServer, MAX_DATAGRAM_SIZE};
