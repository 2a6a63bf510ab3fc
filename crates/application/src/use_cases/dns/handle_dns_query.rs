use crate::ports::{BlocklistMembershipPort, DnsCodec, PendingQueryPort, UpstreamPort};
use dnsgate_domain::{
    normalize_domain, same_domain, AdminConfig, DnsAnswer, DnsMessage, MessageFlags,
    RegisterOutcome, ResponseCode,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Synthesized locally; the bytes go straight back to the client.
    Answered(Vec<u8>),
    /// Registered as pending and sent to the upstream resolver.
    Forwarded,
    /// Nothing is sent back; the client will time out and retry.
    Dropped,
}

/// Decides, per inbound datagram: admin answer, NXDOMAIN for blocked
/// names, or forward upstream. The checks run in exactly that order.
pub struct HandleDnsQueryUseCase {
    codec: Arc<dyn DnsCodec>,
    blocklist: Arc<dyn BlocklistMembershipPort>,
    pending: Arc<dyn PendingQueryPort>,
    upstream: Arc<dyn UpstreamPort>,
    admin: AdminConfig,
}

impl HandleDnsQueryUseCase {
    pub fn new(
        codec: Arc<dyn DnsCodec>,
        blocklist: Arc<dyn BlocklistMembershipPort>,
        pending: Arc<dyn PendingQueryPort>,
        upstream: Arc<dyn UpstreamPort>,
        admin: AdminConfig,
    ) -> Self {
        Self {
            codec,
            blocklist,
            pending,
            upstream,
            admin,
        }
    }

    pub async fn execute(&self, payload: &[u8], client: SocketAddr) -> QueryOutcome {
        let query = match self.codec.decode(payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, client = %client, "Dropping undecodable DNS query");
                return QueryOutcome::Dropped;
            }
        };

        let Some(question) = query.first_question() else {
            debug!(id = query.id, client = %client, "Dropping query without questions");
            return QueryOutcome::Dropped;
        };
        let domain = question.name.as_str();

        debug!(domain = %domain, client = %client, id = query.id, "DNS query received");

        if same_domain(domain, &self.admin.hostname) {
            info!(
                domain = %domain,
                client = %client,
                address = %self.admin.address,
                "Answering admin hostname"
            );
            return self.respond(&self.admin_response(&query), domain);
        }

        if self.blocklist.is_blocked(&normalize_domain(domain)) {
            info!(domain = %domain, client = %client, "Domain blocked");
            return self.respond(&Self::blocked_response(&query), domain);
        }

        self.forward(&query, payload, client, domain).await
    }

    async fn forward(
        &self,
        query: &DnsMessage,
        payload: &[u8],
        client: SocketAddr,
        domain: &str,
    ) -> QueryOutcome {
        let outcome = self.pending.register(query.id, client);
        match outcome {
            RegisterOutcome::Inserted => {}
            RegisterOutcome::Replaced(previous) => {
                warn!(
                    id = query.id,
                    previous_client = %previous,
                    client = %client,
                    "Query id collision, overwriting in-flight entry"
                );
            }
            RegisterOutcome::Rejected(existing) => {
                warn!(
                    id = query.id,
                    existing_client = %existing,
                    client = %client,
                    "Query id collision, dropping new query"
                );
            }
        }
        if !outcome.is_registered() {
            return QueryOutcome::Dropped;
        }

        if let Err(e) = self.upstream.forward(payload).await {
            error!(error = %e, domain = %domain, id = query.id, "Upstream forward failed");
            // Only our own entry is rolled back; a displaced client gets its slot back.
            self.pending.unregister(query.id, client, outcome.displaced());
            return QueryOutcome::Dropped;
        }

        debug!(
            domain = %domain,
            id = query.id,
            upstream = %self.upstream.upstream_name(),
            "Forwarded to upstream"
        );
        QueryOutcome::Forwarded
    }

    fn respond(&self, response: &DnsMessage, domain: &str) -> QueryOutcome {
        match self.codec.encode(response) {
            Ok(bytes) => QueryOutcome::Answered(bytes),
            Err(e) => {
                error!(error = %e, domain = %domain, "Failed to encode synthesized response");
                QueryOutcome::Dropped
            }
        }
    }

    fn admin_response(&self, query: &DnsMessage) -> DnsMessage {
        DnsMessage {
            id: query.id,
            flags: MessageFlags::authoritative_response(),
            questions: query.questions.clone(),
            answers: vec![DnsAnswer::a(
                self.admin.hostname.clone(),
                self.admin.ttl,
                self.admin.address,
            )],
            rcode: ResponseCode::NoError,
        }
    }

    fn blocked_response(query: &DnsMessage) -> DnsMessage {
        DnsMessage {
            id: query.id,
            flags: MessageFlags::authoritative_only(),
            questions: query.questions.clone(),
            answers: Vec::new(),
            rcode: ResponseCode::NxDomain,
        }
    }
}
