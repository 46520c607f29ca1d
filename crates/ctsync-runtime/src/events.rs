//! Session events and the sink they are reported to.
//!
//! The listener and decoder never log directly. Everything observable
//! about a session, including the runtime failures that the state stream
//! does not carry, goes through a [`SyncEventSink`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use ctsync_common::types::{SessionId, WireStatus};

/// Something that happened during an observation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The socket is bound and the session task is running.
    Listening {
        /// Bound socket address.
        socket: PathBuf,
    },
    /// A reporting peer connected.
    Accepted,
    /// A status message was decoded.
    StatusReceived {
        /// Classified wire value.
        status: WireStatus,
    },
    /// A status value outside the known vocabulary was dropped.
    Unrecognized {
        /// Raw wire value.
        value: String,
    },
    /// The terminal value was received and forwarded.
    Terminal,
    /// The peer closed the connection between messages.
    PeerClosed,
    /// The connection carried an undecodable payload.
    DecodeFailed {
        /// Rendered decode error.
        error: String,
    },
    /// Accepting a connection failed.
    AcceptFailed {
        /// Rendered I/O error.
        error: String,
    },
    /// The stream's reader went away before taking a state.
    ConsumerGone,
    /// Cancellation was observed.
    Cancelled,
    /// The session ended and the stream is closed.
    Closed,
}

/// Receives session events.
///
/// Implementors must be cheap to call; `record` runs inline on the
/// session task between socket operations.
pub trait SyncEventSink: Send + Sync {
    /// Records one event for the given session.
    fn record(&self, session: &SessionId, event: &SyncEvent);
}

/// Default sink that forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SyncEventSink for TracingSink {
    fn record(&self, session: &SessionId, event: &SyncEvent) {
        match event {
            SyncEvent::Listening { socket } => {
                tracing::info!(%session, socket = %socket.display(), "listening for container status");
            }
            SyncEvent::Accepted => tracing::info!(%session, "status peer connected"),
            SyncEvent::StatusReceived { status } => {
                tracing::debug!(%session, %status, "status received");
            }
            SyncEvent::Unrecognized { value } => {
                tracing::warn!(%session, status = %value, "unknown status received");
            }
            SyncEvent::Terminal => tracing::info!(%session, "received stopped"),
            SyncEvent::PeerClosed => tracing::info!(%session, "status peer disconnected"),
            SyncEvent::DecodeFailed { error } => {
                tracing::error!(%session, %error, "could not read state");
            }
            SyncEvent::AcceptFailed { error } => {
                tracing::error!(%session, %error, "could not accept sync socket connection");
            }
            SyncEvent::ConsumerGone => {
                tracing::warn!(%session, "state stream dropped by consumer");
            }
            SyncEvent::Cancelled => tracing::info!(%session, "observation cancelled"),
            SyncEvent::Closed => tracing::debug!(%session, "state stream closed"),
        }
    }
}

/// Sink that keeps every event in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SyncEventSink for RecordingSink {
    fn record(&self, _session: &SessionId, event: &SyncEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let session = SessionId::new("s1");
        sink.record(&session, &SyncEvent::Accepted);
        sink.record(&session, &SyncEvent::Terminal);
        assert_eq!(sink.events(), [SyncEvent::Accepted, SyncEvent::Terminal]);
    }

    #[test]
    fn recording_sink_clones_share_storage() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.record(&SessionId::new("s1"), &SyncEvent::Closed);
        assert_eq!(handle.events(), [SyncEvent::Closed]);
    }

    #[test]
    fn tracing_sink_writes_unrecognized_values() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let writer = Arc::clone(&buffer);
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || BufferWriter(Arc::clone(&writer)))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.record(
                &SessionId::new("s1"),
                &SyncEvent::Unrecognized {
                    value: "weird".into(),
                },
            );
        });

        let output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(output.contains("unknown status received"));
        assert!(output.contains("weird"));
        assert!(output.contains("WARN"));
    }

    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
