/// Run state definitions for tracking a search from start to finish
///
/// This module defines the states a search run moves through and which
/// transitions between them are legal.
use std::fmt;

/// Represents the current state of a search run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Created but not started
    Idle,

    /// Pages are being fetched and parsed
    Running,

    // ===== Terminal States =====
    /// Every result page reached a final disposition
    Completed,

    /// The first page could not be fetched or parsed
    Failed,

    /// A stop request prevented some pages from being fetched
    Cancelled,
}

impl RunState {
    /// Returns true if this is a terminal state (the run is over)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the run finished without a stop request or failure
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if a transition from `self` to `next` is legal
    ///
    /// Idle only moves to Running, Running only moves to a terminal state,
    /// and terminal states never change.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::Failed)
                | (Self::Running, Self::Cancelled)
        )
    }

    /// Returns the lowercase name of this state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns all possible run states
    pub fn all_states() -> [Self; 5] {
        [
            Self::Idle,
            Self::Running,
            Self::Completed,
            Self::Failed,
            Self::Cancelled,
        ]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
