use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Failed to encode DNS message: {0}")]
    EncodeFailed(String),

    #[error("Invalid control command: {0}")]
    InvalidControlCommand(String),

    #[error("Blocklist load error: {0}")]
    BlocklistLoad(String),

    #[error("Upstream send failed to {server}: {reason}")]
    UpstreamSendFailed { server: String, reason: String },

    #[error("Control channel error: {0}")]
    ControlChannel(String),

    #[error("Domain source error: {0}")]
    DomainSource(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
