//! Status socket listener.
//!
//! Binds the socket synchronously, then runs one background session task
//! that accepts a reporting peer and drains it into the state stream.

use std::path::Path;
use std::sync::Arc;

use ctsync_common::config::SyncConfig;
use ctsync_common::error::{Result, SyncError};
use ctsync_common::types::SessionId;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

use crate::decoder::{DrainContext, drain};
use crate::events::{SyncEvent, SyncEventSink, TracingSink};
use crate::stream::{self, StateSender, StateStream};

/// Starts observation sessions on a status socket.
pub struct StateListener {
    config: SyncConfig,
    sink: Arc<dyn SyncEventSink>,
}

impl StateListener {
    /// Creates a listener that reports to [`TracingSink`].
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn SyncEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Binds `socket` and starts a session on it.
    ///
    /// Returns as soon as the socket is bound. States arrive on the
    /// returned stream, which closes exactly once when the session ends:
    /// after `Exited`, on cancellation, or on an accept or decode failure.
    /// Runtime failures are reported to the event sink only; a stream that
    /// ends without `Exited` is the caller's sole sign of one.
    ///
    /// The socket file is neither created beforehand nor removed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Bind`] if the socket cannot be bound, or
    /// [`SyncError::Config`] if the configuration is invalid.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&self, cancel: CancellationToken, socket: impl AsRef<Path>) -> Result<StateStream> {
        self.config.validate()?;
        let socket = socket.as_ref();
        let listener = UnixListener::bind(socket).map_err(|e| SyncError::Bind {
            path: socket.to_path_buf(),
            source: e,
        })?;

        let (states, stream) = stream::channel();
        let session = Session {
            id: SessionId::generate(),
            listener,
            cancel,
            states,
            sink: Arc::clone(&self.sink),
            max_message_bytes: self.config.max_message_bytes,
        };
        session.sink.record(
            &session.id,
            &SyncEvent::Listening {
                socket: socket.to_path_buf(),
            },
        );
        drop(tokio::spawn(session.run().with_current_subscriber()));
        Ok(stream)
    }
}

impl Default for StateListener {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

/// Binds `socket` with default settings and returns its state stream.
///
/// # Errors
///
/// Returns [`SyncError::Bind`] if the socket cannot be bound.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn observe_state(cancel: CancellationToken, socket: impl AsRef<Path>) -> Result<StateStream> {
    StateListener::default().start(cancel, socket)
}

/// State owned by one background session task.
struct Session {
    id: SessionId,
    listener: UnixListener,
    cancel: CancellationToken,
    states: StateSender,
    sink: Arc<dyn SyncEventSink>,
    max_message_bytes: usize,
}

impl Session {
    async fn run(self) {
        let Self {
            id,
            listener,
            cancel,
            states,
            sink,
            max_message_bytes,
        } = self;

        loop {
            // A blocked accept is abandoned as soon as the token fires.
            let accepted = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    sink.record(&id, &SyncEvent::Cancelled);
                    break;
                }
                accepted = listener.accept() => accepted,
            };

            let conn = match accepted {
                Ok((conn, _addr)) => conn,
                Err(error) => {
                    sink.record(
                        &id,
                        &SyncEvent::AcceptFailed {
                            error: error.to_string(),
                        },
                    );
                    break;
                }
            };
            sink.record(&id, &SyncEvent::Accepted);

            let ctx = DrainContext {
                session: &id,
                cancel: &cancel,
                states: &states,
                sink: sink.as_ref(),
                max_message_bytes,
            };
            if drain(&ctx, conn).await.should_stop_session() {
                break;
            }
        }

        drop(listener);
        sink.record(&id, &SyncEvent::Closed);
        drop(states);
    }
}
