use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    #[serde(default = "default_socket_name")]
    pub socket_name: String,

    /// Directory holding the Unix socket. Ignored on Windows.
    #[serde(default)]
    pub socket_dir: Option<String>,

    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,
}

impl ControlConfig {
    pub fn endpoint(&self) -> ControlEndpoint {
        if cfg!(windows) {
            ControlEndpoint::NamedPipe(format!(r"\\.\pipe\{}", self.socket_name))
        } else {
            let dir = self
                .socket_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir);
            ControlEndpoint::UnixSocket(dir.join(format!("{}.sock", self.socket_name)))
        }
    }

    /// Pause between control channel client connection attempts.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            socket_name: default_socket_name(),
            socket_dir: None,
            reconnect_delay_ms: default_reconnect_delay_ms(),
        }
    }
}

/// Platform-specific address of the control channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlEndpoint {
    UnixSocket(PathBuf),
    NamedPipe(String),
}

impl fmt::Display for ControlEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlEndpoint::UnixSocket(path) => write!(f, "unix:{}", path.display()),
            ControlEndpoint::NamedPipe(name) => write!(f, "pipe:{}", name),
        }
    }
}

fn default_socket_name() -> String {
    "dns-control".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    2000
}
