use crate::ports::{DnsCodec, PendingQueryPort};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Matches an upstream answer to the client that asked, by transaction id.
/// The caller relays the raw upstream bytes untouched.
pub struct RelayUpstreamResponseUseCase {
    codec: Arc<dyn DnsCodec>,
    pending: Arc<dyn PendingQueryPort>,
}

impl RelayUpstreamResponseUseCase {
    pub fn new(codec: Arc<dyn DnsCodec>, pending: Arc<dyn PendingQueryPort>) -> Self {
        Self { codec, pending }
    }

    pub fn execute(&self, response: &[u8]) -> Option<SocketAddr> {
        let message = match self.codec.decode(response) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Dropping undecodable upstream response");
                return None;
            }
        };

        match self.pending.resolve(message.id) {
            Some(client) => {
                debug!(
                    id = message.id,
                    client = %client,
                    rcode = %message.rcode,
                    "Relaying upstream response"
                );
                Some(client)
            }
            None => {
                // Duplicate, late or unsolicited packet.
                debug!(id = message.id, "No pending query for upstream response");
                None
            }
        }
    }
}
