//! Unbuffered hand-off of lifecycle states from the session task to the
//! caller.
//!
//! Each value travels with a one-shot acknowledgement, so a send completes
//! only once the reader has taken the value. The reporting peer is paced by
//! how fast the caller consumes states.

use ctsync_common::types::LifecycleState;
use futures::Stream;
use tokio::sync::{mpsc, oneshot};

type Handoff = (LifecycleState, oneshot::Sender<()>);

/// Creates a connected sender and stream.
pub(crate) fn channel() -> (StateSender, StateStream) {
    let (tx, rx) = mpsc::channel(1);
    (StateSender { tx }, StateStream { rx })
}

/// Read side of a session's state stream.
///
/// Yields states in the order they were decoded. `None` means the session
/// has ended, whether because the container reported `stopped`, the
/// observation was cancelled, or the connection failed.
#[derive(Debug)]
pub struct StateStream {
    rx: mpsc::Receiver<Handoff>,
}

impl StateStream {
    /// Waits for the next state. Returns `None` once the session has ended.
    pub async fn recv(&mut self) -> Option<LifecycleState> {
        let (state, ack) = self.rx.recv().await?;
        // The sender may have given up after cancellation; the state was
        // still decoded before that, so it is delivered anyway.
        let _ = ack.send(());
        Some(state)
    }

    /// Adapts this stream into a [`futures::Stream`].
    pub fn into_stream(self) -> impl Stream<Item = LifecycleState> {
        futures::stream::unfold(self, |mut states| async move {
            let state = states.recv().await?;
            Some((state, states))
        })
    }
}

/// Returned when the reader dropped the stream before taking a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConsumerGone;

/// Write side of a session's state stream. Owned by the session task.
#[derive(Debug)]
pub(crate) struct StateSender {
    tx: mpsc::Sender<Handoff>,
}

impl StateSender {
    /// Hands `state` to the reader and waits until it has been received.
    pub(crate) async fn send(&self, state: LifecycleState) -> Result<(), ConsumerGone> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send((state, ack_tx))
            .await
            .map_err(|_| ConsumerGone)?;
        ack_rx.await.map_err(|_| ConsumerGone)
    }
}
