use dnsgate_domain::{DnsMessage, DomainError};

/// Wire-format codec for DNS messages.
pub trait DnsCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DnsMessage, DomainError>;
    fn encode(&self, message: &DnsMessage) -> Result<Vec<u8>, DomainError>;
}
