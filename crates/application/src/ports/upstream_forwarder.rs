use async_trait::async_trait;
use dnsgate_domain::DomainError;

#[async_trait]
pub trait UpstreamPort: Send + Sync {
    /// Sends the raw query bytes, unmodified, to the upstream resolver.
    async fn forward(&self, query: &[u8]) -> Result<(), DomainError>;

    fn upstream_name(&self) -> String;
}
