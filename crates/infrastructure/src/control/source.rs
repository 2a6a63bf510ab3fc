use arc_swap::ArcSwap;
use async_trait::async_trait;
use dnsgate_application::ports::BlockedDomainSource;
use dnsgate_domain::DomainError;
use std::sync::Arc;

/// In-memory domain list, for embedding the control client next to a store
/// that is not otherwise reachable, and for tests.
pub struct StaticDomainSource {
    domains: ArcSwap<Vec<String>>,
}

impl StaticDomainSource {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: ArcSwap::from_pointee(domains.into_iter().map(Into::into).collect()),
        }
    }

    pub fn replace<I, S>(&self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains
            .store(Arc::new(domains.into_iter().map(Into::into).collect()));
    }
}

#[async_trait]
impl BlockedDomainSource for StaticDomainSource {
    async fn blocked_domains(&self) -> Result<Vec<String>, DomainError> {
        Ok(Vec::clone(&self.domains.load()))
    }
}
