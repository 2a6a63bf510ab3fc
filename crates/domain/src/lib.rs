//! dnsgate Domain Layer
pub mod config;
pub mod control_command;
pub mod dns_message;
pub mod domain_name;
pub mod errors;
pub mod pending_query;

pub use config::{
    AdminConfig, BlockingConfig, CliOverrides, Config, ConfigError, ControlConfig,
    ControlEndpoint, EnvOverrides, IdCollisionPolicy, LogFormat, LoggingConfig, ServerConfig,
    UpstreamConfig,
};
pub use control_command::{ControlCommand, ControlStatus, ServerStatus};
pub use dns_message::{
    AnswerData, DnsAnswer, DnsMessage, DnsQuestion, MessageFlags, ResponseCode, QCLASS_IN,
    QTYPE_A,
};
pub use domain_name::{normalize_domain, same_domain};
pub use errors::DomainError;
pub use pending_query::{PendingQuery, RegisterOutcome};
