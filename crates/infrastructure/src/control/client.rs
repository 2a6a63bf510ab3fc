use super::codec::ControlLineCodec;
use super::transport::{connect, ControlStream};
use dnsgate_application::ports::BlockedDomainSource;
use dnsgate_domain::{ControlCommand, ControlEndpoint, ControlStatus, DomainError};
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt, WriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle to the background task that keeps the proxy's override set in step
/// with an authoritative domain store.
///
/// Commands sent while disconnected are queued in order and flushed on the
/// next connection, before anything else. Every `{"status":"up"}` from the
/// proxy triggers a full `sync` from the [`BlockedDomainSource`].
#[derive(Clone)]
pub struct ControlChannelClient {
    commands: mpsc::UnboundedSender<ControlCommand>,
}

impl ControlChannelClient {
    pub fn spawn(
        endpoint: ControlEndpoint,
        source: Arc<dyn BlockedDomainSource>,
        reconnect_delay: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let worker = ClientWorker {
            endpoint,
            source,
            reconnect_delay,
            receiver,
            receiver_open: true,
            queue: VecDeque::new(),
        };
        tokio::spawn(worker.run(shutdown));
        Self { commands }
    }

    pub fn send(&self, command: ControlCommand) -> Result<(), DomainError> {
        self.commands
            .send(command)
            .map_err(|_| DomainError::ControlChannel("Control client task has stopped".to_string()))
    }

    pub fn add(&self, domain: impl Into<String>) -> Result<(), DomainError> {
        self.send(ControlCommand::add(domain))
    }

    pub fn remove(&self, domain: impl Into<String>) -> Result<(), DomainError> {
        self.send(ControlCommand::remove(domain))
    }

    pub fn sync<I, S>(&self, domains: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(ControlCommand::sync(domains))
    }
}

enum SessionEnd {
    Disconnected,
    Shutdown,
}

struct ClientWorker {
    endpoint: ControlEndpoint,
    source: Arc<dyn BlockedDomainSource>,
    reconnect_delay: Duration,
    receiver: mpsc::UnboundedReceiver<ControlCommand>,
    receiver_open: bool,
    /// Commands taken off the channel but not yet written. Always drained
    /// before the channel.
    queue: VecDeque<ControlCommand>,
}

impl ClientWorker {
    async fn run(mut self, shutdown: CancellationToken) {
        loop {
            let connected = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = connect(&self.endpoint) => result,
            };

            match connected {
                Ok(stream) => {
                    info!(endpoint = %self.endpoint, "Connected to DNS control channel");
                    if let SessionEnd::Shutdown = self.session(stream, &shutdown).await {
                        break;
                    }
                    info!(
                        delay_ms = self.reconnect_delay.as_millis() as u64,
                        queued = self.queue.len(),
                        "DNS control channel disconnected, retrying"
                    );
                }
                Err(e) => {
                    debug!(endpoint = %self.endpoint, error = %e, "DNS control channel unavailable");
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        debug!(queued = self.queue.len(), "Control client stopped");
    }

    async fn session(&mut self, stream: ControlStream, shutdown: &CancellationToken) -> SessionEnd {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = FramedRead::new(reader, ControlLineCodec::new());

        // Anything submitted while disconnected goes out first, in order.
        while let Ok(command) = self.receiver.try_recv() {
            self.queue.push_back(command);
        }
        if !self.flush_queue(&mut writer).await {
            return SessionEnd::Disconnected;
        }

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return SessionEnd::Shutdown,
                next = lines.next() => match next {
                    Some(Ok(line)) => {
                        if !self.handle_server_line(&line, &mut writer).await {
                            return SessionEnd::Disconnected;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "DNS control channel read error");
                        return SessionEnd::Disconnected;
                    }
                    None => return SessionEnd::Disconnected,
                },
                command = self.receiver.recv(), if self.receiver_open => match command {
                    Some(command) => {
                        self.queue.push_back(command);
                        if !self.flush_queue(&mut writer).await {
                            return SessionEnd::Disconnected;
                        }
                    }
                    None => self.receiver_open = false,
                },
            }
        }
    }

    /// Returns `false` when the connection should be considered lost.
    async fn handle_server_line(
        &mut self,
        line: &str,
        writer: &mut WriteHalf<ControlStream>,
    ) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }

        match ControlStatus::parse_line(line) {
            Ok(status) if status.is_up() => match self.source.blocked_domains().await {
                Ok(domains) => {
                    debug!(domains = domains.len(), "DNS server up, syncing blocked domains");
                    self.queue.push_back(ControlCommand::sync(domains));
                    self.flush_queue(writer).await
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load blocked domains for sync");
                    true
                }
            },
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Bad message from DNS control channel");
                true
            }
        }
    }

    /// Write queued commands in order. A command whose write fails goes back
    /// to the head of the queue.
    async fn flush_queue<W>(&mut self, writer: &mut W) -> bool
    where
        W: AsyncWrite + Unpin,
    {
        while let Some(command) = self.queue.pop_front() {
            let line = match command.to_line() {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, action = command.action(), "Dropping unserializable command");
                    continue;
                }
            };

            let written = match writer.write_all(line.as_bytes()).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            };

            if let Err(e) = written {
                warn!(error = %e, action = command.action(), "Control command write failed");
                self.queue.push_front(command);
                return false;
            }
            debug!(action = command.action(), "Control command sent");
        }
        true
    }
}
