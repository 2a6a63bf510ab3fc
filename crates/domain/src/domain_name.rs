/// Canonical form used for every blocklist and admin comparison:
/// ASCII-lowercased, surrounding whitespace and the trailing root dot removed.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

/// Case-insensitive comparison that ignores a trailing root dot on either side.
pub fn same_domain(a: &str, b: &str) -> bool {
    let a = a.trim().trim_end_matches('.');
    let b = b.trim().trim_end_matches('.');
    a.eq_ignore_ascii_case(b)
}
