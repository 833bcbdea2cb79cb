//! Agent configuration.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Largest number of undetermined cells brute force will enumerate.
/// Masks are `u32`, so this cannot grow without changing the representation.
pub const MAX_ENUMERATION_CELLS: u32 = 32;

/// Tunables for one agent. Every field has a default, so an empty JSON or JS
/// object deserializes to `AgentConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgentConfig {
    /// Overrides the seed derived from the match parameters.
    pub seed: Option<u64>,
    /// Enumeration size ceiling; above it a random cell is guessed.
    pub max_enumeration_cells: u32,
    /// Render the agent's view of the board at `trace` level every turn.
    pub trace_board: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_enumeration_cells: MAX_ENUMERATION_CELLS,
            trace_board: false,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.max_enumeration_cells == 0 || self.max_enumeration_cells > MAX_ENUMERATION_CELLS {
            return Err(AgentError::config(format!(
                "max_enumeration_cells must be in 1..={MAX_ENUMERATION_CELLS}, got {}",
                self.max_enumeration_cells
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.max_enumeration_cells, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_limit_cannot_exceed_mask_width() {
        let config = AgentConfig {
            max_enumeration_cells: 33,
            ..AgentConfig::default()
        };
        assert!(matches!(config.validate(), Err(AgentError::Config { .. })));

        let config = AgentConfig {
            max_enumeration_cells: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
