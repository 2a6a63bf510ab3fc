use super::codec::ControlLineCodec;
use super::transport::{ControlListener, ControlStream};
use dnsgate_application::use_cases::ApplyControlCommandUseCase;
use dnsgate_domain::{ControlCommand, ControlEndpoint, ControlStatus, DomainError};
use futures::StreamExt;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodecError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Pause after a failed accept, e.g. on EMFILE.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Accepts control connections and applies the commands they carry to the
/// blocklist override set.
pub struct ControlChannelServer {
    listener: ControlListener,
    endpoint: ControlEndpoint,
    use_case: Arc<ApplyControlCommandUseCase>,
}

impl ControlChannelServer {
    pub fn bind(
        endpoint: ControlEndpoint,
        use_case: Arc<ApplyControlCommandUseCase>,
    ) -> Result<Self, DomainError> {
        let listener = ControlListener::bind(&endpoint)?;
        Ok(Self {
            listener,
            endpoint,
            use_case,
        })
    }

    pub fn endpoint(&self) -> &ControlEndpoint {
        &self.endpoint
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(endpoint = %self.endpoint, "Control channel listening");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Control channel: shutting down");
                    break;
                }
                result = self.listener.accept() => {
                    match result {
                        Ok(stream) => {
                            debug!("Control client connected");
                            tokio::spawn(handle_connection(
                                stream,
                                self.use_case.clone(),
                                shutdown.child_token(),
                            ));
                        }
                        Err(e) => {
                            error!(error = %e, "Control channel accept failed");
                            if !backoff(&shutdown).await {
                                info!("Control channel: shutting down");
                                break;
                            }
                        }
                    }
                }
            }
        }

        self.listener.cleanup();
    }
}

/// Sleeps for `ACCEPT_ERROR_BACKOFF`; false if shutdown fired first.
async fn backoff(shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => true,
    }
}

async fn handle_connection(
    stream: ControlStream,
    use_case: Arc<ApplyControlCommandUseCase>,
    shutdown: CancellationToken,
) {
    let (reader, mut writer) = tokio::io::split(stream);

    if let Err(e) = announce_ready(&mut writer).await {
        if e.kind() == io::ErrorKind::BrokenPipe {
            debug!("Control client disconnected before handshake");
        } else {
            warn!(error = %e, "Failed to write control handshake");
        }
        return;
    }

    let mut lines = FramedRead::new(reader, ControlLineCodec::new());

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            next = lines.next() => match next {
                Some(Ok(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match ControlCommand::parse_line(line) {
                        Ok(command) => use_case.execute(&command),
                        Err(e) => warn!(error = %e, "Skipping invalid control command"),
                    }
                }
                Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                    warn!("Skipping oversized control line");
                }
                Some(Err(LinesCodecError::Io(e))) => {
                    warn!(error = %e, "Control connection read error");
                    break;
                }
                None => break,
            },
        }
    }

    debug!("Control client disconnected");
}

async fn announce_ready<W>(writer: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = ControlStatus::up()
        .to_line()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
