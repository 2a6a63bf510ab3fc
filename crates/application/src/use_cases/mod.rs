pub mod control;
pub mod dns;
pub mod pending;

pub use control::ApplyControlCommandUseCase;
pub use dns::{HandleDnsQueryUseCase, QueryOutcome, RelayUpstreamResponseUseCase};
pub use pending::EvictExpiredQueriesUseCase;
