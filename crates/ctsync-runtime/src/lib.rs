//! Container state synchronization over a local status socket.
//!
//! A supervised container reports its own lifecycle by writing JSON status
//! objects to a Unix socket. [`StateListener`] binds that socket, accepts
//! a single reporting connection, decodes its messages, and hands the
//! resulting [`LifecycleState`] values to the caller through an
//! unbuffered [`StateStream`].
//!
//! Only binding can fail synchronously. Every later failure ends the
//! session and is visible to the caller solely as the stream closing
//! without a trailing [`LifecycleState::Exited`]; the cause is reported
//! to the configured [`SyncEventSink`].

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod codec;
pub mod decoder;
pub mod events;
pub mod listener;
pub mod stream;

pub use ctsync_common::types::LifecycleState;
pub use events::{SyncEvent, SyncEventSink, TracingSink};
pub use listener::{StateListener, observe_state};
pub use stream::StateStream;
pub use tokio_util::sync::CancellationToken;
