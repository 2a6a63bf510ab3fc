use async_trait::async_trait;
use dnsgate_domain::DomainError;

/// Authoritative store of operator-managed blocked domains, read by the
/// control client whenever the proxy announces readiness.
#[async_trait]
pub trait BlockedDomainSource: Send + Sync {
    async fn blocked_domains(&self) -> Result<Vec<String>, DomainError>;
}
