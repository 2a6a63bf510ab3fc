use dnsgate_domain::{ControlEndpoint, DomainError};
use std::io;
use tokio::io::{AsyncRead, AsyncWrite};

#[cfg(unix)]
use std::path::PathBuf;
#[cfg(unix)]
use tokio::net::{UnixListener, UnixStream};
#[cfg(windows)]
use tokio::net::windows::named_pipe::{ClientOptions, NamedPipeServer, ServerOptions};

pub trait ControlIo: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ControlIo for T {}

/// A connected control-channel stream, whichever the platform transport.
pub type ControlStream = Box<dyn ControlIo>;

pub enum ControlListener {
    #[cfg(unix)]
    Unix {
        listener: UnixListener,
        path: PathBuf,
    },
    #[cfg(windows)]
    Pipe {
        name: String,
        server: NamedPipeServer,
    },
}

impl ControlListener {
    /// Bind the endpoint. A stale Unix socket file left by an earlier run is
    /// removed first.
    pub fn bind(endpoint: &ControlEndpoint) -> Result<Self, DomainError> {
        match endpoint {
            #[cfg(unix)]
            ControlEndpoint::UnixSocket(path) => {
                if path.exists() {
                    std::fs::remove_file(path).map_err(|e| {
                        DomainError::ControlChannel(format!(
                            "Failed to remove stale socket {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                }
                let listener = UnixListener::bind(path).map_err(|e| {
                    DomainError::ControlChannel(format!(
                        "Failed to bind {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(ControlListener::Unix {
                    listener,
                    path: path.clone(),
                })
            }
            #[cfg(windows)]
            ControlEndpoint::NamedPipe(name) => {
                let server = ServerOptions::new()
                    .first_pipe_instance(true)
                    .create(name)
                    .map_err(|e| {
                        DomainError::ControlChannel(format!("Failed to create pipe {}: {}", name, e))
                    })?;
                Ok(ControlListener::Pipe {
                    name: name.clone(),
                    server,
                })
            }
            #[allow(unreachable_patterns)]
            other => Err(DomainError::ControlChannel(format!(
                "Endpoint {} is not supported on this platform",
                other
            ))),
        }
    }

    pub async fn accept(&mut self) -> io::Result<ControlStream> {
        match self {
            #[cfg(unix)]
            ControlListener::Unix { listener, .. } => {
                let (stream, _) = listener.accept().await?;
                Ok(Box::new(stream))
            }
            #[cfg(windows)]
            ControlListener::Pipe { name, server } => {
                server.connect().await?;
                let next = ServerOptions::new().create(name.as_str())?;
                let connected = std::mem::replace(server, next);
                Ok(Box::new(connected))
            }
        }
    }

    /// Remove the socket file, if the transport has one.
    pub fn cleanup(&self) {
        match self {
            #[cfg(unix)]
            ControlListener::Unix { path, .. } => {
                if let Err(e) = std::fs::remove_file(path) {
                    if e.kind() != io::ErrorKind::NotFound {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to remove control socket");
                    }
                }
            }
            #[cfg(windows)]
            ControlListener::Pipe { .. } => {}
        }
    }
}

pub async fn connect(endpoint: &ControlEndpoint) -> io::Result<ControlStream> {
    match endpoint {
        #[cfg(unix)]
        ControlEndpoint::UnixSocket(path) => Ok(Box::new(UnixStream::connect(path).await?)),
        #[cfg(windows)]
        ControlEndpoint::NamedPipe(name) => Ok(Box::new(ClientOptions::new().open(name)?)),
        #[allow(unreachable_patterns)]
        other => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("Endpoint {} is not supported on this platform", other),
        )),
    }
}
