pub mod handle_dns_query;
pub mod relay_upstream_response;

pub use handle_dns_query::{HandleDnsQueryUseCase, QueryOutcome};
pub use relay_upstream_response::RelayUpstreamResponseUseCase;
