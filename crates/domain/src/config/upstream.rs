use serde::{Deserialize, Serialize};

/// What the pending table does when a forwarded query reuses an id that is
/// still waiting for its upstream answer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdCollisionPolicy {
    /// Last write wins; the earlier client never receives an answer.
    #[default]
    Overwrite,
    /// Keep the earlier entry and drop the new query.
    Reject,
}

impl IdCollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "overwrite",
            Self::Reject => "reject",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_address")]
    pub address: String,

    /// Pending entries older than this are evicted by the sweep job.
    #[serde(default = "default_pending_timeout_secs")]
    pub pending_timeout_secs: u64,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    #[serde(default)]
    pub id_collision: IdCollisionPolicy,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            pending_timeout_secs: default_pending_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            id_collision: IdCollisionPolicy::default(),
        }
    }
}

fn default_address() -> String {
    "8.8.8.8:53".to_string()
}

fn default_pending_timeout_secs() -> u64 {
    10
}

fn default_sweep_interval_secs() -> u64 {
    5
}
