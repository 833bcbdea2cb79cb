//! Turn controller and match lifecycle.
//!
//! The harness calls [`Agent::initialize`] once, [`Agent::choose_cell`] once
//! per turn after applying the previous choice, and [`Agent::game_over`] when
//! the match ends.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::config::AgentConfig;
use crate::enumeration::BruteForce;
use crate::error::AgentError;
use crate::harness::MineLayout;
use crate::knowledge::KnowledgeStore;
use crate::render::{render_layout, render_view};
use crate::rng::AgentRng;
use crate::solver;
use crate::types::{BoardState, Coordinate, NeighborCache};

/// Why a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum EndReason {
    #[display("all safe cells opened")]
    Won,
    #[display("opened a mine")]
    HitMine,
    #[display("ran out of time")]
    Timeout,
    #[display("chose an invalid cell")]
    InvalidMove,
}

impl EndReason {
    /// Decode the numeric reason code a harness passes across an FFI boundary.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Won),
            1 => Some(Self::HitMine),
            2 => Some(Self::Timeout),
            3 => Some(Self::InvalidMove),
            _ => None,
        }
    }
}

/// What the agent knew when the match ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub reason: EndReason,
    pub opened: usize,
    pub turns: u32,
    /// Cells the agent confirmed as mines.
    pub confirmed_mines: usize,
    /// Confirmed cells that were not actually mines. Always 0 on a consistent board.
    pub false_mines: usize,
}

pub struct Agent {
    height: usize,
    width: usize,
    /// Number of the turn about to be played, starting at 1.
    turn: u32,
    store: KnowledgeStore,
    nc: NeighborCache,
    brute_force: BruteForce,
    config: AgentConfig,
}

impl Agent {
    /// Start a match with the default configuration.
    pub fn initialize(height: usize, width: usize, total_mines: usize) -> Result<Self, AgentError> {
        Self::with_config(height, width, total_mines, AgentConfig::default())
    }

    #[instrument(skip(config))]
    pub fn with_config(
        height: usize,
        width: usize,
        total_mines: usize,
        config: AgentConfig,
    ) -> Result<Self, AgentError> {
        if height == 0 || width == 0 {
            return Err(AgentError::config(format!(
                "board must be at least 1x1, got {height}x{width}"
            )));
        }
        if total_mines >= height * width {
            return Err(AgentError::config(format!(
                "{total_mines} mines do not fit a {height}x{width} board with a free cell"
            )));
        }
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => AgentRng::from_seed(seed),
            None => AgentRng::for_match(height, width, total_mines),
        };
        info!(height, width, total_mines, seed = ?config.seed, "match started");

        Ok(Self {
            height,
            width,
            turn: 1,
            store: KnowledgeStore::new(height, width, total_mines),
            nc: NeighborCache::new(height, width),
            brute_force: BruteForce::new(rng, &config),
            config,
        })
    }

    /// Pick the cell to open this turn.
    ///
    /// `time_remaining_ms` is informational and does not affect the choice.
    #[instrument(skip(self, board), fields(turn = self.turn))]
    pub fn choose_cell(&mut self, board: &BoardState, time_remaining_ms: u64) -> Result<Coordinate, AgentError> {
        if board.height != self.height || board.width != self.width || board.cells.len() != self.height * self.width {
            return Err(AgentError::BoardShape {
                height: self.height,
                width: self.width,
                cells: board.cells.len(),
            });
        }
        if self.config.trace_board {
            trace!(view = %render_view(board, &self.store), "board");
        }

        let chosen = if self.turn == 1 {
            let center = Coordinate::new(self.height / 2, self.width / 2);
            self.store.enqueue(center);
            center
        } else {
            solver::resolve(board, &mut self.store, &self.nc, &mut self.brute_force)?
        };

        // A fresh number next to the chosen cell may unlock these again.
        let opened: Vec<Coordinate> = self
            .nc
            .get(chosen)
            .iter()
            .copied()
            .filter(|&n| !board.is_unopened(n))
            .collect();
        self.store.enqueue_safe(&opened);

        debug!(
            cell = %chosen,
            mines_remaining = self.store.mines_remaining(),
            queued = self.store.queue_len(),
            time_remaining_ms,
            "chose cell"
        );
        self.turn += 1;
        Ok(chosen)
    }

    /// Report the end of the match. Compares the agent's beliefs with the
    /// true layout and logs the result.
    #[instrument(skip(self, layout))]
    pub fn game_over(&mut self, layout: &MineLayout, reason: EndReason, opened: usize) -> MatchSummary {
        let mut confirmed_mines = 0;
        let mut false_mines = 0;
        if layout.height == self.height && layout.width == self.width {
            for row in 0..self.height {
                for column in 0..self.width {
                    if self.store.is_mine(Coordinate::new(row, column)) {
                        confirmed_mines += 1;
                        if !layout.get(row, column) {
                            false_mines += 1;
                        }
                    }
                }
            }
        } else {
            confirmed_mines = self.store.confirmed_mines();
        }

        let summary = MatchSummary {
            reason,
            opened,
            turns: self.turn - 1,
            confirmed_mines,
            false_mines,
        };
        info!(
            %reason,
            opened,
            turns = summary.turns,
            confirmed_mines,
            false_mines,
            "match over"
        );
        debug!(layout = %render_layout(layout), "true mines");
        summary
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn mines_remaining(&self) -> usize {
        self.store.mines_remaining()
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.store
    }
}
