//! Local control channel: newline-delimited JSON over a Unix domain socket
//! (or a named pipe on Windows).

pub mod client;
pub mod codec;
pub mod server;
pub mod source;
pub mod transport;

pub use client::ControlChannelClient;
pub use codec::{ControlLineCodec, MAX_LINE_LENGTH};
pub use server::ControlChannelServer;
pub use source::StaticDomainSource;
pub use transport::{connect, ControlListener, ControlStream};
