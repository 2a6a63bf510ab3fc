use bytes::BytesMut;
use tokio_util::codec::{Decoder, LinesCodec, LinesCodecError};
use tracing::debug;

pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Line framing for the control channel.
///
/// Complete lines are yielded in order. Bytes after the last newline stay
/// buffered until more data arrives, and are discarded if the peer closes
/// first: an unterminated line is never treated as a command.
#[derive(Debug, Clone)]
pub struct ControlLineCodec {
    inner: LinesCodec,
}

impl ControlLineCodec {
    pub fn new() -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(MAX_LINE_LENGTH),
        }
    }
}

impl Default for ControlLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for ControlLineCodec {
    type Item = String;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        self.inner.decode(buf)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, LinesCodecError> {
        match self.inner.decode(buf)? {
            Some(line) => Ok(Some(line)),
            None => {
                if !buf.is_empty() {
                    debug!(bytes = buf.len(), "Discarding unterminated control line");
                    buf.clear();
                }
                Ok(None)
            }
        }
    }
}
