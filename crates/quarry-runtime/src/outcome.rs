//! Tagged outcomes for workbench operations.
//!
//! Block executions have no structured error handling, so workbench
//! operations never return `Err` — every failure is reported as an
//! outcome variant and mirrored into the shared result state for
//! callers that only poll.

/// Outcome of [`Workbench::run`](crate::Workbench::run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The service executed the program and results were recorded.
    Completed,
    /// No circuit was created before the run; nothing was sent.
    NoCircuit,
    /// The service answered but reported a failure.
    Rejected(String),
    /// The request never completed: timeout, connection failure, or a
    /// non-success HTTP status.
    Unreachable(String),
}

impl RunOutcome {
    /// Check if the run completed successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }
}

/// Outcome of a visualization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VizOutcome {
    /// The artifact was shown and the viewer dismissed it (or no
    /// viewer was attached to show it to).
    Dismissed,
    /// The payload was empty; nothing was rendered.
    NothingToShow,
    /// Rendering failed; no event was raised.
    Failed(String),
}

/// The shape a caller wants result data in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataShape {
    /// The textual summary of the last run.
    #[default]
    Text,
    /// The outcome histogram as a JSON object string.
    Counts,
}

impl DataShape {
    /// Parse a block-menu selector. `"counts"` selects the histogram;
    /// anything else selects the text, matching the menu's permissive
    /// default.
    pub fn parse(selector: &str) -> Self {
        if selector.eq_ignore_ascii_case("counts") {
            DataShape::Counts
        } else {
            DataShape::Text
        }
    }
}
