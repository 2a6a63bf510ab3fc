pub mod admin;
pub mod blocking;
pub mod control;
pub mod errors;
pub mod logging;
pub mod root;
pub mod server;
pub mod upstream;

pub use admin::AdminConfig;
pub use blocking::BlockingConfig;
pub use control::{ControlConfig, ControlEndpoint};
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config, EnvOverrides};
pub use server::ServerConfig;
pub use upstream::{IdCollisionPolicy, UpstreamConfig};
