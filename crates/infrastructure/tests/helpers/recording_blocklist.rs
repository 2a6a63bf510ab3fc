#![allow(dead_code)]
use dnsgate_application::ports::BlocklistMembershipPort;
use dnsgate_domain::ControlCommand;
use std::sync::{Arc, Mutex};

/// Records every applied control command, in arrival order.
#[derive(Default, Clone)]
pub struct RecordingBlocklist {
    applied: Arc<Mutex<Vec<ControlCommand>>>,
}

impl RecordingBlocklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Vec<ControlCommand> {
        self.applied.lock().unwrap().clone()
    }
}

impl BlocklistMembershipPort for RecordingBlocklist {
    fn is_blocked(&self, _domain: &str) -> bool {
        false
    }

    fn apply_command(&self, command: &ControlCommand) {
        self.applied.lock().unwrap().push(command.clone());
    }

    fn override_count(&self) -> usize {
        0
    }

    fn filter_count(&self) -> usize {
        0
    }
}
