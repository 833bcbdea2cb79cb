//! Minesweeper playing agent.
//!
//! Each turn the agent is handed the revealed board and returns one cell to
//! open. Local counting rules over a queue of interesting cells do most of
//! the work; when they stall, every mine placement over the remaining
//! unopened cells is enumerated and the safest cell is picked.
//!
//! The WASM exports take grids as flat row-major arrays:
//! `cells[row * width + column]`.

pub mod agent;
pub mod config;
pub mod enumeration;
pub mod error;
pub mod harness;
pub mod knowledge;
pub mod render;
pub mod rng;
pub mod solver;
pub mod types;

pub use agent::{Agent, EndReason, MatchSummary};
pub use config::AgentConfig;
pub use error::AgentError;
pub use types::{BoardState, Coordinate, UNOPENED_FIELD};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;

    use crate::harness::MineLayout;
    use crate::{Agent, AgentConfig, AgentError, BoardState, EndReason};

    fn to_js(err: AgentError) -> JsError {
        JsError::new(&err.to_string())
    }

    /// One agent for one match, driven by a JavaScript harness.
    #[wasm_bindgen(js_name = "Agent")]
    pub struct WasmAgent {
        inner: Agent,
        height: usize,
        width: usize,
    }

    #[wasm_bindgen(js_class = "Agent")]
    impl WasmAgent {
        /// `config` is an optional plain object, e.g. `{ seed: 7, traceBoard: true }`.
        #[wasm_bindgen(constructor)]
        pub fn new(height: usize, width: usize, mines: usize, config: JsValue) -> Result<WasmAgent, JsError> {
            let config: AgentConfig = if config.is_undefined() || config.is_null() {
                AgentConfig::default()
            } else {
                serde_wasm_bindgen::from_value(config)?
            };
            let inner = Agent::with_config(height, width, mines, config).map_err(to_js)?;
            Ok(WasmAgent { inner, height, width })
        }

        /// Returns `{ row, column }` of the cell to open.
        #[wasm_bindgen(js_name = "chooseCell")]
        pub fn choose_cell(&mut self, board_flat: &[i32], time_remaining: u32) -> Result<JsValue, JsError> {
            let board = BoardState::from_flat(self.height, self.width, board_flat.to_vec()).map_err(to_js)?;
            let chosen = self.inner.choose_cell(&board, u64::from(time_remaining)).map_err(to_js)?;

            let obj = js_sys::Object::new();
            js_sys::Reflect::set(&obj, &"row".into(), &(chosen.row as u32).into())
                .map_err(|_| JsError::new("failed to build result"))?;
            js_sys::Reflect::set(&obj, &"column".into(), &(chosen.column as u32).into())
                .map_err(|_| JsError::new("failed to build result"))?;
            Ok(obj.into())
        }

        /// `reason`: 0 won, 1 hit a mine, 2 timeout, 3 invalid move.
        /// Returns the match summary as a plain object.
        #[wasm_bindgen(js_name = "gameOver")]
        pub fn game_over(&mut self, mines_flat: &[u8], reason: u8, opened: u32) -> Result<JsValue, JsError> {
            let layout = MineLayout::from_flat(self.height, self.width, mines_flat).map_err(to_js)?;
            let reason = EndReason::from_code(reason)
                .ok_or_else(|| JsError::new(&format!("unknown end reason {reason}")))?;
            let summary = self.inner.game_over(&layout, reason, opened as usize);
            Ok(serde_wasm_bindgen::to_value(&summary)?)
        }
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM agent ready".to_string()
    }
}
