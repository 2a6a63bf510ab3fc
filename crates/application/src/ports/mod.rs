mod blocked_domain_source;
mod blocklist_membership;
mod dns_codec;
mod pending_query_table;
mod upstream_forwarder;

pub use blocked_domain_source::BlockedDomainSource;
pub use blocklist_membership::BlocklistMembershipPort;
pub use dns_codec::DnsCodec;
pub use pending_query_table::PendingQueryPort;
pub use upstream_forwarder::UpstreamPort;
