//! dnsgate Infrastructure Layer
pub mod blocklist;
pub mod control;
pub mod dns;
