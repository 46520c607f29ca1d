//! Domain types for container state synchronization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::TERMINAL_STATUS;

/// Lifecycle phase reported by a container being created and started.
///
/// Variants are declared in the order a well-behaved peer reports them.
/// Nothing enforces that order at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Container is being created at the moment.
    Creating,
    /// Container was created without errors.
    Created,
    /// Container is running.
    Running,
    /// Container has finished, possibly with errors.
    Exited,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => write!(f, "creating"),
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Exited => write!(f, "exited"),
        }
    }
}

/// One status record as written by the reporting peer: `{"status": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Raw wire value.
    pub status: String,
}

impl StatusMessage {
    /// Builds a message carrying the given wire value.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    /// Classifies the carried wire value.
    #[must_use]
    pub fn classify(&self) -> WireStatus {
        WireStatus::parse(&self.status)
    }
}

/// Classification of a wire status value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WireStatus {
    /// `"creating"`
    Creating,
    /// `"created"`
    Created,
    /// `"running"`
    Running,
    /// `"stopped"`, the terminal value.
    Stopped,
    /// Any other string. Logged and dropped by the decoder.
    Unrecognized(String),
}

impl WireStatus {
    /// Classifies a raw wire value. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "creating" => Self::Creating,
            "created" => Self::Created,
            "running" => Self::Running,
            TERMINAL_STATUS => Self::Stopped,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Returns the state to emit for this value, if any.
    #[must_use]
    pub const fn lifecycle_state(&self) -> Option<LifecycleState> {
        match self {
            Self::Creating => Some(LifecycleState::Creating),
            Self::Created => Some(LifecycleState::Created),
            Self::Running => Some(LifecycleState::Running),
            Self::Stopped => Some(LifecycleState::Exited),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether this value ends the connection.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns the string a peer writes for this value.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Creating => "creating",
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => TERMINAL_STATUS,
            Self::Unrecognized(value) => value,
        }
    }
}

impl fmt::Display for WireStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Identifier attached to every event of one observation session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
