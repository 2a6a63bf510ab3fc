use super::bloom::AtomicBloom;
use super::parser::parse_blocklist;
use arc_swap::ArcSwap;
use dnsgate_application::ports::BlocklistMembershipPort;
use dnsgate_domain::{normalize_domain, BlockingConfig, ControlCommand, DomainError};
use rustc_hash::FxHashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Override set plus bloom filter.
///
/// The override set is replaced wholesale on every mutation so readers on the
/// query path never take a lock. The filter is filled once at startup.
pub struct BlocklistMembership {
    overrides: ArcSwap<FxHashSet<String>>,
    filter: AtomicBloom,
}

impl BlocklistMembership {
    pub fn new(capacity: usize, fp_rate: f64) -> Self {
        Self {
            overrides: ArcSwap::from_pointee(FxHashSet::default()),
            filter: AtomicBloom::new(capacity, fp_rate),
        }
    }

    pub fn from_config(config: &BlockingConfig) -> Self {
        Self::new(config.filter_capacity, config.false_positive_rate)
    }

    /// Insert already-extracted domains into the filter.
    pub fn load_domains<I, S>(&self, domains: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = 0;
        for domain in domains {
            let domain = normalize_domain(domain.as_ref());
            if domain.is_empty() {
                continue;
            }
            self.filter.insert(domain.as_str());
            loaded += 1;
        }
        loaded
    }

    pub fn load_from_file(&self, path: &Path) -> Result<usize, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::BlocklistLoad(format!("{}: {}", path.display(), e))
        })?;

        let loaded = self.load_domains(parse_blocklist(&content));
        info!(
            path = %path.display(),
            entries = loaded,
            bits = self.filter.num_bits(),
            hashes = self.filter.num_hashes(),
            "Blocklist loaded into bloom filter"
        );
        Ok(loaded)
    }

    pub fn is_overridden(&self, domain: &str) -> bool {
        self.overrides.load().contains(&normalize_domain(domain))
    }

    fn replace_overrides(&self, domains: &[String]) {
        let next: FxHashSet<String> = domains
            .iter()
            .map(|domain| normalize_domain(domain))
            .filter(|domain| !domain.is_empty())
            .collect();
        self.overrides.store(Arc::new(next));
    }

    fn insert_override(&self, domain: &str) {
        let domain = normalize_domain(domain);
        if domain.is_empty() || self.overrides.load().contains(&domain) {
            return;
        }
        self.overrides.rcu(|current| {
            let mut next = FxHashSet::clone(current);
            next.insert(domain.clone());
            next
        });
    }

    fn remove_override(&self, domain: &str) {
        let domain = normalize_domain(domain);
        if !self.overrides.load().contains(&domain) {
            return;
        }
        self.overrides.rcu(|current| {
            let mut next = FxHashSet::clone(current);
            next.remove(&domain);
            next
        });
    }
}

impl BlocklistMembershipPort for BlocklistMembership {
    fn is_blocked(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        self.overrides.load().contains(&domain) || self.filter.contains(domain.as_str())
    }

    fn apply_command(&self, command: &ControlCommand) {
        match command {
            ControlCommand::Sync { domains } => self.replace_overrides(domains),
            ControlCommand::Add { domain } => self.insert_override(domain),
            ControlCommand::Remove { domain } => self.remove_override(domain),
        }
    }

    fn override_count(&self) -> usize {
        self.overrides.load().len()
    }

    fn filter_count(&self) -> usize {
        self.filter.len()
    }
}
