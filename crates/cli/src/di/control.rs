use super::DnsServices;
use dnsgate_application::use_cases::ApplyControlCommandUseCase;
use std::sync::Arc;

pub struct ControlServices {
    pub apply_command: Arc<ApplyControlCommandUseCase>,
}

impl ControlServices {
    pub fn new(dns: &DnsServices) -> Self {
        Self {
            apply_command: Arc::new(ApplyControlCommandUseCase::new(dns.blocklist.clone())),
        }
    }
}
