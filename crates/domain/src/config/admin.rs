use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// The reserved hostname answered directly by the proxy, bypassing the blocklist.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    #[serde(default = "default_hostname")]
    pub hostname: String,

    #[serde(default = "default_address")]
    pub address: Ipv4Addr,

    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            address: default_address(),
            ttl: default_ttl(),
        }
    }
}

fn default_hostname() -> String {
    "dnsmanager.test".to_string()
}

fn default_address() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, 83)
}

fn default_ttl() -> u32 {
    300
}
