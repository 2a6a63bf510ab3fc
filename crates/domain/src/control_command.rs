//! Control-plane messages exchanged over the local control channel.
//!
//! Framing is one JSON object per `\n`-terminated line:
//!
//! ```text
//! server -> client   {"status":"up"}
//! client -> server   {"action":"sync","domains":["a.com","b.com"]}
//!                    {"action":"add","domain":"a.com"}
//!                    {"action":"remove","domain":"a.com"}
//! ```

use crate::DomainError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ControlCommand {
    /// Replace the whole override set.
    Sync { domains: Vec<String> },
    Add { domain: String },
    Remove { domain: String },
}

impl ControlCommand {
    pub fn sync<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ControlCommand::Sync {
            domains: domains.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(domain: impl Into<String>) -> Self {
        ControlCommand::Add {
            domain: domain.into(),
        }
    }

    pub fn remove(domain: impl Into<String>) -> Self {
        ControlCommand::Remove {
            domain: domain.into(),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            ControlCommand::Sync { .. } => "sync",
            ControlCommand::Add { .. } => "add",
            ControlCommand::Remove { .. } => "remove",
        }
    }

    pub fn parse_line(line: &str) -> Result<Self, DomainError> {
        serde_json::from_str(line).map_err(|e| DomainError::InvalidControlCommand(e.to_string()))
    }

    /// Serialized form including the terminating newline.
    pub fn to_line(&self) -> Result<String, DomainError> {
        let mut line = serde_json::to_string(self)
            .map_err(|e| DomainError::InvalidControlCommand(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
}

/// Readiness announcement written by the server right after accepting a
/// connection. It does not acknowledge any command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    pub status: ServerStatus,
}

impl ControlStatus {
    pub const fn up() -> Self {
        Self {
            status: ServerStatus::Up,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ServerStatus::Up
    }

    pub fn parse_line(line: &str) -> Result<Self, DomainError> {
        serde_json::from_str(line).map_err(|e| DomainError::ControlChannel(e.to_string()))
    }

    pub fn to_line(&self) -> Result<String, DomainError> {
        let mut line =
            serde_json::to_string(self).map_err(|e| DomainError::ControlChannel(e.to_string()))?;
        line.push('\n');
        Ok(line)
    }
}
