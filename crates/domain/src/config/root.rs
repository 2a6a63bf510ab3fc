use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::admin::AdminConfig;
use super::blocking::BlockingConfig;
use super::control::ControlConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

/// Main configuration structure for dnsgate
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// UDP listener (bind address, port)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolver and pending-query housekeeping
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Blocklist file and bloom filter sizing
    #[serde(default)]
    pub blocking: BlockingConfig,

    /// Administrative hostname answered locally
    #[serde(default)]
    pub admin: AdminConfig,

    /// Control channel endpoint and client reconnect delay
    #[serde(default)]
    pub control: ControlConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order (later wins):
    /// 1. Defaults
    /// 2. Explicit path, else dnsgate.toml, else /etc/dnsgate/config.toml
    /// 3. Environment variables
    /// 4. Command-line flags
    pub fn load(
        path: Option<&str>,
        env_overrides: EnvOverrides,
        cli_overrides: CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(env_overrides);
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn apply_env_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(host) = overrides.dns_host {
            self.server.bind_address = host;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(name) = overrides.socket_name {
            self.control.socket_name = name;
        }
        if let Some(dir) = overrides.socket_dir {
            self.control.socket_dir = Some(dir);
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(path) = overrides.blocklist_path {
            self.blocking.blocklist_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.address = upstream;
        }
        if let Some(path) = overrides.blocklist_path {
            self.blocking.blocklist_path = path;
        }
        if let Some(name) = overrides.socket_name {
            self.control.socket_name = name;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        self.server.listen_addr()?;
        self.upstream_addr()?;

        if self.upstream.pending_timeout_secs == 0 || self.upstream.sweep_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "Pending timeout and sweep interval must be greater than 0".to_string(),
            ));
        }

        if self.blocking.filter_capacity == 0 {
            return Err(ConfigError::Validation(
                "Bloom filter capacity must be greater than 0".to_string(),
            ));
        }

        let rate = self.blocking.false_positive_rate;
        if !(rate > 0.0 && rate < 1.0) {
            return Err(ConfigError::Validation(format!(
                "False positive rate must be in (0, 1), got {}",
                rate
            )));
        }

        if self.admin.hostname.trim().trim_end_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "Admin hostname cannot be empty".to_string(),
            ));
        }

        if self.control.socket_name.is_empty() {
            return Err(ConfigError::Validation(
                "Control socket name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn upstream_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.upstream.address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid upstream address '{}': {}",
                self.upstream.address, e
            ))
        })
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("dnsgate.toml").exists() {
            Some("dnsgate.toml".to_string())
        } else if std::path::Path::new("/etc/dnsgate/config.toml").exists() {
            Some("/etc/dnsgate/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub upstream: Option<String>,
    pub blocklist_path: Option<String>,
    pub socket_name: Option<String>,
    pub log_level: Option<String>,
}

/// Environment-style overrides (`DNS_HOST`, `DNS_PORT`, `DNS_SOCKET_NAME`, ...)
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub dns_host: Option<String>,
    pub dns_port: Option<u16>,
    pub socket_name: Option<String>,
    pub socket_dir: Option<String>,
    pub upstream: Option<String>,
    pub blocklist_path: Option<String>,
    pub log_level: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build overrides from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let dns_port = match get("DNS_PORT") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::Env("DNS_PORT".to_string(), e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            dns_host: get("DNS_HOST"),
            dns_port,
            socket_name: get("DNS_SOCKET_NAME"),
            socket_dir: get("DNS_SOCKET_DIR"),
            upstream: get("DNS_UPSTREAM"),
            blocklist_path: get("DNS_BLOCKLIST"),
            log_level: get("DNS_LOG_LEVEL"),
        })
    }
}
