//! Reference game harness: mine placement, hint calculation, single-cell
//! reveal and a match driver that calls the agent lifecycle in order.
//!
//! The agent never looks at any of this; it is here so matches can be played
//! end to end in tests and from JavaScript.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::agent::{Agent, EndReason, MatchSummary};
use crate::error::AgentError;
use crate::rng::AgentRng;
use crate::types::{BoardState, Coordinate, NeighborCache};

/// True mine positions, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayout {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<bool>,
}

impl MineLayout {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![false; height * width],
        }
    }

    /// Wrap a flat row-major buffer where any non-zero byte is a mine.
    pub fn from_flat(height: usize, width: usize, cells: &[u8]) -> Result<Self, AgentError> {
        if cells.len() != height * width {
            return Err(AgentError::BoardShape {
                height,
                width,
                cells: cells.len(),
            });
        }
        Ok(Self {
            height,
            width,
            cells: cells.iter().map(|&v| v != 0).collect(),
        })
    }

    #[inline(always)]
    pub fn get(&self, row: usize, column: usize) -> bool {
        self.cells[row * self.width + column]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, column: usize, val: bool) {
        self.cells[row * self.width + column] = val;
    }

    #[inline(always)]
    pub fn is_mine(&self, at: Coordinate) -> bool {
        self.get(at.row, at.column)
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v).count()
    }
}

/// Place `mine_count` mines uniformly at random, keeping every cell within
/// Chebyshev distance `safe_radius` of `safe` clear.
pub fn place_mines(
    height: usize,
    width: usize,
    mine_count: usize,
    safe: Coordinate,
    safe_radius: usize,
    rng: &mut AgentRng,
) -> Result<MineLayout, AgentError> {
    let mut eligible: Vec<Coordinate> = (0..height * width)
        .map(|i| Coordinate::new(i / width, i % width))
        .filter(|c| c.row.abs_diff(safe.row) > safe_radius || c.column.abs_diff(safe.column) > safe_radius)
        .collect();

    if mine_count > eligible.len() {
        return Err(AgentError::config(format!(
            "cannot place {mine_count} mines outside the safe zone, only {} cells available",
            eligible.len()
        )));
    }

    // Partial Fisher-Yates: the first `mine_count` slots end up random.
    let mut layout = MineLayout::new(height, width);
    for i in 0..mine_count {
        let j = i + rng.gen_range(eligible.len() - i);
        eligible.swap(i, j);
        layout.set(eligible[i].row, eligible[i].column, true);
    }

    Ok(layout)
}

/// Neighbor mine counts for every cell. Mine cells keep 0.
pub fn calculate_numbers(layout: &MineLayout, nc: &NeighborCache) -> Vec<i32> {
    let mut numbers = vec![0; layout.height * layout.width];
    for row in 0..layout.height {
        for column in 0..layout.width {
            if layout.get(row, column) {
                continue;
            }
            numbers[row * layout.width + column] = nc
                .get(Coordinate::new(row, column))
                .iter()
                .filter(|&&n| layout.is_mine(n))
                .count() as i32;
        }
    }
    numbers
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Safe(u8),
    Mine,
    AlreadyOpen,
    OutOfBounds,
}

/// A game in progress: the hidden layout and what has been revealed so far.
pub struct Minefield {
    layout: MineLayout,
    numbers: Vec<i32>,
    board: BoardState,
}

impl Minefield {
    pub fn new(layout: MineLayout) -> Self {
        let nc = NeighborCache::new(layout.height, layout.width);
        let numbers = calculate_numbers(&layout, &nc);
        let board = BoardState::new(layout.height, layout.width);
        Self {
            layout,
            numbers,
            board,
        }
    }

    /// Random layout with the center cell and its neighbors kept clear.
    pub fn generate(height: usize, width: usize, mine_count: usize, seed: u64) -> Result<Self, AgentError> {
        let mut rng = AgentRng::from_seed(seed);
        let center = Coordinate::new(height / 2, width / 2);
        let layout = place_mines(height, width, mine_count, center, 1, &mut rng)?;
        Ok(Self::new(layout))
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    pub fn opened(&self) -> usize {
        self.board.opened_count()
    }

    pub fn is_cleared(&self) -> bool {
        self.opened() == self.layout.cells.len() - self.layout.count()
    }

    /// Open exactly one cell. Zeros do not cascade.
    pub fn reveal(&mut self, at: Coordinate) -> RevealOutcome {
        if !self.board.in_bounds(at) {
            return RevealOutcome::OutOfBounds;
        }
        if !self.board.is_unopened(at) {
            return RevealOutcome::AlreadyOpen;
        }
        if self.layout.is_mine(at) {
            return RevealOutcome::Mine;
        }
        let n = self.numbers[at.row * self.layout.width + at.column];
        self.board.set(at, n);
        RevealOutcome::Safe(n as u8)
    }
}

/// Everything that happened in one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchReport {
    pub reason: EndReason,
    pub choices: Vec<Coordinate>,
    pub summary: MatchSummary,
}

/// Play `agent` against `field` until the game ends or `max_turns` choices
/// have been made, then report the end to the agent.
#[instrument(skip(agent, field))]
pub fn play_match(agent: &mut Agent, field: &mut Minefield, max_turns: usize) -> MatchReport {
    let mut choices = Vec::new();

    let reason = loop {
        if field.is_cleared() {
            break EndReason::Won;
        }
        if choices.len() >= max_turns {
            break EndReason::Timeout;
        }

        let chosen = match agent.choose_cell(field.board(), 0) {
            Ok(chosen) => chosen,
            Err(err) => {
                debug!(error = %err, "agent failed to choose");
                break EndReason::InvalidMove;
            }
        };
        choices.push(chosen);

        match field.reveal(chosen) {
            RevealOutcome::Safe(_) => {}
            RevealOutcome::Mine => break EndReason::HitMine,
            RevealOutcome::AlreadyOpen | RevealOutcome::OutOfBounds => break EndReason::InvalidMove,
        }
    };

    let summary = agent.game_over(field.layout(), reason, field.opened());
    MatchReport {
        reason,
        choices,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_mines_count() {
        let mut rng = AgentRng::from_seed(42);
        let layout = place_mines(16, 30, 99, Coordinate::new(8, 15), 1, &mut rng).unwrap();
        assert_eq!(layout.count(), 99);
    }

    #[test]
    fn test_place_mines_safe_zone() {
        let mut rng = AgentRng::from_seed(42);
        let layout = place_mines(10, 10, 20, Coordinate::new(5, 5), 2, &mut rng).unwrap();
        for row in 3..=7 {
            for column in 3..=7 {
                assert!(!layout.get(row, column), "mine in safe zone at ({row}, {column})");
            }
        }
        assert_eq!(layout.count(), 20);
    }

    #[test]
    fn test_place_mines_rejects_overfull_board() {
        let mut rng = AgentRng::from_seed(1);
        assert!(place_mines(3, 3, 1, Coordinate::new(1, 1), 1, &mut rng).is_err());
    }

    #[test]
    fn test_calculate_numbers_center_mine() {
        let nc = NeighborCache::new(3, 3);
        let mut layout = MineLayout::new(3, 3);
        layout.set(1, 1, true);
        let numbers = calculate_numbers(&layout, &nc);
        assert_eq!(numbers, vec![1, 1, 1, 1, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_calculate_numbers_corner_mine() {
        let nc = NeighborCache::new(3, 3);
        let mut layout = MineLayout::new(3, 3);
        layout.set(0, 0, true);
        let numbers = calculate_numbers(&layout, &nc);
        assert_eq!(numbers, vec![0, 1, 0, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reveal_single_cell() {
        let mut layout = MineLayout::new(3, 3);
        layout.set(0, 0, true);
        let mut field = Minefield::new(layout);
        assert_eq!(field.reveal(Coordinate::new(2, 2)), RevealOutcome::Safe(0));
        // No cascade from a zero.
        assert_eq!(field.opened(), 1);
        assert_eq!(field.reveal(Coordinate::new(2, 2)), RevealOutcome::AlreadyOpen);
        assert_eq!(field.reveal(Coordinate::new(0, 0)), RevealOutcome::Mine);
        assert_eq!(field.reveal(Coordinate::new(3, 0)), RevealOutcome::OutOfBounds);
        assert!(!field.is_cleared());
    }

    #[test]
    fn test_generate_keeps_center_clear() {
        let field = Minefield::generate(9, 9, 10, 5).unwrap();
        assert_eq!(field.layout().count(), 10);
        for row in 3..=5 {
            for column in 3..=5 {
                assert!(!field.layout().get(row, column));
            }
        }
    }
}
