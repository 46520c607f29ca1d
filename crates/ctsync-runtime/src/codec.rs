//! Streaming decoder for the status wire protocol.
//!
//! The peer writes an unframed sequence of JSON objects. Each value is
//! self-delimiting, so the codec parses one value at a time off the front
//! of the read buffer and waits for more bytes while a value is incomplete.

use bytes::{Buf, BytesMut};
use ctsync_common::types::StatusMessage;
use thiserror::Error;
use tokio_util::codec::Decoder;

/// Failure to decode a status message. Always ends the connection.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Reading from the connection failed.
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not a valid status object.
    #[error("malformed status message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The peer closed the connection in the middle of a message.
    #[error("connection closed with {remaining} bytes of an incomplete message")]
    Truncated {
        /// Bytes left undecoded at end of stream.
        remaining: usize,
    },

    /// A single message grew past the configured cap before completing.
    #[error("status message exceeds {limit} bytes")]
    Oversized {
        /// Configured cap in bytes.
        limit: usize,
    },
}

/// [`Decoder`] yielding one [`StatusMessage`] per JSON value on the wire.
#[derive(Debug, Clone)]
pub struct StatusCodec {
    max_message_bytes: usize,
}

impl StatusCodec {
    /// Creates a codec that rejects messages larger than `max_message_bytes`.
    #[must_use]
    pub const fn new(max_message_bytes: usize) -> Self {
        Self { max_message_bytes }
    }
}

impl Default for StatusCodec {
    fn default() -> Self {
        Self::new(ctsync_common::constants::DEFAULT_MAX_MESSAGE_BYTES)
    }
}

impl Decoder for StatusCodec {
    type Item = StatusMessage;
    type Error = DecodeError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let whitespace = src.iter().take_while(|b| b.is_ascii_whitespace()).count();
        src.advance(whitespace);
        if src.is_empty() {
            return Ok(None);
        }

        let (next, consumed) = {
            let mut values =
                serde_json::Deserializer::from_slice(&src[..]).into_iter::<StatusMessage>();
            let next = values.next();
            (next, values.byte_offset())
        };
        match next {
            Some(Ok(message)) => {
                src.advance(consumed);
                Ok(Some(message))
            }
            Some(Err(e)) if e.is_eof() => {
                if src.len() > self.max_message_bytes {
                    return Err(DecodeError::Oversized {
                        limit: self.max_message_bytes,
                    });
                }
                Ok(None)
            }
            Some(Err(e)) => Err(DecodeError::Malformed(e)),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(buf)? {
            Some(message) => Ok(Some(message)),
            None if buf.is_empty() => Ok(None),
            None => Err(DecodeError::Truncated {
                remaining: buf.len(),
            }),
        }
    }
}
