//! Blocklist file parsing.
//!
//! Accepts both plain domain lists and hosts-file style lists:
//!
//! ```text
//! # comment
//! ads.example.com
//! 0.0.0.0 tracker.example.com
//! 127.0.0.1 metrics.example.com   # trailing comment
//! ```

use dnsgate_domain::normalize_domain;
use std::net::IpAddr;

const SYSTEM_HOSTS: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "broadcasthost",
    "ip6-localhost",
    "ip6-loopback",
    "ip6-localnet",
    "ip6-mcastprefix",
    "ip6-allnodes",
    "ip6-allrouters",
    "ip6-allhosts",
    "0.0.0.0",
];

/// Extract the normalized domain from one line, if it carries one.
pub fn parse_blocklist_line(line: &str) -> Option<String> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut fields = content.split_whitespace();
    let first = fields.next()?;

    // Loopback and broadcast names in hosts-format files are not blocklist entries.
    let hosts_format = first.parse::<IpAddr>().is_ok();
    let domain = if hosts_format { fields.next()? } else { first };

    let domain = normalize_domain(domain);
    if domain.is_empty() || (hosts_format && SYSTEM_HOSTS.contains(&domain.as_str())) {
        return None;
    }
    Some(domain)
}

pub fn parse_blocklist(content: &str) -> Vec<String> {
    content.lines().filter_map(parse_blocklist_line).collect()
}
