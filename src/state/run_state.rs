/// Run state definitions for tracking collection progress
///
/// This module defines the states a collection run moves through, from
/// building the first URL to handing the records to the output sinks.
use std::fmt;

/// Represents the current state of a collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    // ===== Active States =====
    /// First-page URL is being composed
    Init,

    /// First page is being fetched to read the total page count
    DiscoverPageCount,

    /// A results page is being fetched
    FetchPage,

    /// Records are being extracted from a fetched page
    ExtractPage,

    /// Records are being handed to the output sinks
    Finalize,

    // ===== Terminal States =====
    /// Run completed and all outputs were written
    Done,

    /// Run stopped on a fatal error
    Aborted,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if this is an active state
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// `Aborted` is reachable from every active state. Terminal states
    /// never transition.
    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;

        if self.is_terminal() {
            return false;
        }
        if next == Aborted {
            return true;
        }

        matches!(
            (self, next),
            (Init, DiscoverPageCount)
                | (DiscoverPageCount, FetchPage)
                | (DiscoverPageCount, Finalize)
                | (FetchPage, ExtractPage)
                | (ExtractPage, FetchPage)
                | (ExtractPage, Finalize)
                | (Finalize, Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::DiscoverPageCount => "discover_page_count",
            Self::FetchPage => "fetch_page",
            Self::ExtractPage => "extract_page",
            Self::Finalize => "finalize",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Returns all possible run states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Init,
            Self::DiscoverPageCount,
            Self::FetchPage,
            Self::ExtractPage,
            Self::Finalize,
            Self::Done,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
