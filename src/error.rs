//! Agent error types.

use derive_more::{Display, Error};

/// Everything that can go wrong inside a turn.
///
/// None of these occur during well-formed play. `EmptyFrontier` and
/// `NoCandidate` are internal invariant violations: the harness asked for a
/// move when no unopened cell is left that is not a known mine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum AgentError {
    /// Brute force was entered with no undetermined cell on the board.
    #[display("internal invariant violated: brute force entered with no undetermined cells")]
    EmptyFrontier,
    /// Enumeration left every undetermined cell marked as a mine.
    #[display("internal invariant violated: every undetermined cell is a known mine")]
    NoCandidate,
    /// The board does not have the dimensions the agent was initialized with.
    #[display("board shape mismatch: expected {height}x{width}, got {cells} cells")]
    BoardShape {
        height: usize,
        width: usize,
        cells: usize,
    },
    /// Rejected initialization parameters or configuration.
    #[display("invalid agent config: {reason}")]
    Config { reason: String },
}

impl AgentError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert!(AgentError::EmptyFrontier.to_string().contains("invariant"));
        let shape = AgentError::BoardShape {
            height: 3,
            width: 4,
            cells: 11,
        };
        assert_eq!(shape.to_string(), "board shape mismatch: expected 3x4, got 11 cells");
        assert_eq!(
            AgentError::config("zero width").to_string(),
            "invalid agent config: zero width"
        );
    }
}
