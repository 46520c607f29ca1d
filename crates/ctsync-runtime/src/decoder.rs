//! Per-connection decode loop.
//!
//! Reads status messages off one accepted connection, maps them to
//! lifecycle states, and forwards them until the connection is exhausted.

use ctsync_common::types::SessionId;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;

use crate::codec::StatusCodec;
use crate::events::{SyncEvent, SyncEventSink};
use crate::stream::StateSender;

/// Why [`drain`] stopped reading a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// `stopped` was received and `Exited` delivered.
    Terminal,
    /// The peer closed the connection between messages.
    PeerClosed,
    /// A payload could not be decoded or read.
    DecodeFailed,
    /// The reader dropped the state stream.
    ConsumerGone,
    /// Cancellation was observed.
    Cancelled,
}

impl DrainOutcome {
    /// Whether the session should end without waiting for another peer.
    ///
    /// Every way a connection ends also ends its session; only one peer
    /// is ever serviced.
    #[must_use]
    pub const fn should_stop_session(self) -> bool {
        match self {
            Self::Terminal
            | Self::PeerClosed
            | Self::DecodeFailed
            | Self::ConsumerGone
            | Self::Cancelled => true,
        }
    }
}

/// Everything the decode loop borrows from its session.
pub(crate) struct DrainContext<'a> {
    pub(crate) session: &'a SessionId,
    pub(crate) cancel: &'a CancellationToken,
    pub(crate) states: &'a StateSender,
    pub(crate) sink: &'a dyn SyncEventSink,
    pub(crate) max_message_bytes: usize,
}

/// Decodes `conn` until a terminal value, failure, or cancellation.
///
/// The connection is dropped on every return path.
pub(crate) async fn drain<R>(ctx: &DrainContext<'_>, conn: R) -> DrainOutcome
where
    R: AsyncRead + Unpin + Send,
{
    let mut frames = FramedRead::new(conn, StatusCodec::new(ctx.max_message_bytes));

    loop {
        let next = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                ctx.sink.record(ctx.session, &SyncEvent::Cancelled);
                return DrainOutcome::Cancelled;
            }
            next = frames.next() => next,
        };

        let message = match next {
            Some(Ok(message)) => message,
            Some(Err(error)) => {
                ctx.sink.record(
                    ctx.session,
                    &SyncEvent::DecodeFailed {
                        error: error.to_string(),
                    },
                );
                return DrainOutcome::DecodeFailed;
            }
            None => {
                ctx.sink.record(ctx.session, &SyncEvent::PeerClosed);
                return DrainOutcome::PeerClosed;
            }
        };

        let status = message.classify();
        ctx.sink.record(
            ctx.session,
            &SyncEvent::StatusReceived {
                status: status.clone(),
            },
        );
        let Some(state) = status.lifecycle_state() else {
            ctx.sink.record(
                ctx.session,
                &SyncEvent::Unrecognized {
                    value: message.status,
                },
            );
            continue;
        };

        let sent = tokio::select! {
            biased;
            () = ctx.cancel.cancelled() => {
                ctx.sink.record(ctx.session, &SyncEvent::Cancelled);
                return DrainOutcome::Cancelled;
            }
            sent = ctx.states.send(state) => sent,
        };
        if sent.is_err() {
            ctx.sink.record(ctx.session, &SyncEvent::ConsumerGone);
            return DrainOutcome::ConsumerGone;
        }

        if status.is_terminal() {
            ctx.sink.record(ctx.session, &SyncEvent::Terminal);
            return DrainOutcome::Terminal;
        }
    }
}
