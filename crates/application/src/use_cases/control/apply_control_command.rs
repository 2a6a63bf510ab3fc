use crate::ports::BlocklistMembershipPort;
use dnsgate_domain::ControlCommand;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ApplyControlCommandUseCase {
    blocklist: Arc<dyn BlocklistMembershipPort>,
}

impl ApplyControlCommandUseCase {
    pub fn new(blocklist: Arc<dyn BlocklistMembershipPort>) -> Self {
        Self { blocklist }
    }

    /// Commands are idempotent: re-adding a present domain or removing an
    /// absent one leaves the override set as it was.
    pub fn execute(&self, command: &ControlCommand) {
        self.blocklist.apply_command(command);

        match command {
            ControlCommand::Sync { domains } => {
                info!(
                    received = domains.len(),
                    overrides = self.blocklist.override_count(),
                    "Override set synced"
                );
            }
            ControlCommand::Add { domain } | ControlCommand::Remove { domain } => {
                debug!(
                    action = command.action(),
                    domain = %domain,
                    overrides = self.blocklist.override_count(),
                    "Override set updated"
                );
            }
        }
    }
}
