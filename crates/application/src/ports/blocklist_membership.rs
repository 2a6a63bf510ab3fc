use dnsgate_domain::ControlCommand;

/// Two-tier domain matcher: an exact, mutable override set layered over a
/// write-once probabilistic filter.
///
/// `remove` and `sync` only ever touch the override tier. A domain that was
/// loaded into the filter stays blocked no matter which control commands are
/// applied afterwards.
pub trait BlocklistMembershipPort: Send + Sync {
    fn is_blocked(&self, domain: &str) -> bool;
    fn apply_command(&self, command: &ControlCommand);
    fn override_count(&self) -> usize;
    fn filter_count(&self) -> usize;
}
