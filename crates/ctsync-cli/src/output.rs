//! Formatted output helpers for CLI commands.

use ctsync_runtime::LifecycleState;

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Renders one reported state as a status line.
#[must_use]
pub fn format_state(state: LifecycleState) -> String {
    let color = match state {
        LifecycleState::Creating | LifecycleState::Created => YELLOW,
        LifecycleState::Running => GREEN,
        LifecycleState::Exited => DIM,
    };
    format!("  {color}●{RESET} {state}")
}

/// How an observation session ended, as far as the CLI can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSummary {
    /// The container reported `stopped`.
    Exited,
    /// The user interrupted the session.
    Cancelled,
    /// The stream closed without `Exited`: a decode, accept, or peer failure.
    EndedEarly,
}

/// Classifies the end of a session from the last state seen.
#[must_use]
pub fn summarize(last: Option<LifecycleState>, cancelled: bool) -> SessionSummary {
    match last {
        Some(LifecycleState::Exited) => SessionSummary::Exited,
        _ if cancelled => SessionSummary::Cancelled,
        _ => SessionSummary::EndedEarly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_state_includes_name() {
        assert!(format_state(LifecycleState::Running).contains("running"));
        assert!(format_state(LifecycleState::Exited).contains("exited"));
    }

    #[test]
    fn exited_wins_over_cancellation() {
        assert_eq!(
            summarize(Some(LifecycleState::Exited), true),
            SessionSummary::Exited
        );
    }

    #[test]
    fn cancellation_without_exited() {
        assert_eq!(summarize(None, true), SessionSummary::Cancelled);
    }

    #[test]
    fn stream_ending_early_is_reported() {
        assert_eq!(
            summarize(Some(LifecycleState::Running), false),
            SessionSummary::EndedEarly
        );
        assert_eq!(summarize(None, false), SessionSummary::EndedEarly);
    }
}
