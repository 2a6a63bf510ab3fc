use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockingConfig {
    /// Newline-delimited domain list loaded into the bloom filter at startup.
    #[serde(default = "default_blocklist_path")]
    pub blocklist_path: String,

    #[serde(default = "default_filter_capacity")]
    pub filter_capacity: usize,

    #[serde(default = "default_false_positive_rate")]
    pub false_positive_rate: f64,
}

impl Default for BlockingConfig {
    fn default() -> Self {
        Self {
            blocklist_path: default_blocklist_path(),
            filter_capacity: default_filter_capacity(),
            false_positive_rate: default_false_positive_rate(),
        }
    }
}

fn default_blocklist_path() -> String {
    "hosts/hosts.txt".to_string()
}

fn default_filter_capacity() -> usize {
    500_000
}

fn default_false_positive_rate() -> f64 {
    0.001
}
