#![allow(unused_imports)]
mod dns_server_mock;
mod recording_blocklist;
mod wire;

pub use dns_server_mock::MockDnsServer;
pub use recording_blocklist::RecordingBlocklist;
pub use wire::{build_query, wait_until};
