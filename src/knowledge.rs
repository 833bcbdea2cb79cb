//! What the agent believes about each cell, and the queue of cells to analyze.
//!
//! One [`CellState`] per cell replaces separate mine, in-queue and completed
//! collections. The queue itself only fixes the order; membership is read
//! from the cell state.

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::types::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Nothing deduced, not waiting in the queue.
    Unknown,
    /// Waiting in the queue.
    Queued,
    /// Revealed and every neighboring mine accounted for. Never revisited.
    Completed,
    /// Deduced to be a mine. Never reset within a match.
    Mine,
}

pub struct KnowledgeStore {
    pub height: usize,
    pub width: usize,
    cells: Vec<CellState>,
    queue: VecDeque<Coordinate>,
    mines_remaining: usize,
}

impl KnowledgeStore {
    pub fn new(height: usize, width: usize, total_mines: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![CellState::Unknown; height * width],
            queue: VecDeque::new(),
            mines_remaining: total_mines,
        }
    }

    #[inline(always)]
    pub fn state(&self, at: Coordinate) -> CellState {
        self.cells[at.row * self.width + at.column]
    }

    #[inline(always)]
    fn set_state(&mut self, at: Coordinate, state: CellState) {
        self.cells[at.row * self.width + at.column] = state;
    }

    #[inline(always)]
    pub fn is_mine(&self, at: Coordinate) -> bool {
        self.state(at) == CellState::Mine
    }

    pub fn mines_remaining(&self) -> usize {
        self.mines_remaining
    }

    /// Number of cells confirmed as mines so far.
    pub fn confirmed_mines(&self) -> usize {
        self.cells.iter().filter(|&&s| s == CellState::Mine).count()
    }

    /// Record `at` as a mine. Returns `true` only the first time.
    pub fn mark_mine(&mut self, at: Coordinate) -> bool {
        if self.is_mine(at) {
            return false;
        }
        self.set_state(at, CellState::Mine);
        match self.mines_remaining.checked_sub(1) {
            Some(left) => self.mines_remaining = left,
            None => warn!(cell = %at, "confirmed more mines than the board holds"),
        }
        trace!(cell = %at, mines_remaining = self.mines_remaining, "mine confirmed");
        true
    }

    /// Append `at` unless it is already queued, completed or a known mine.
    /// Returns whether it was added.
    pub fn enqueue(&mut self, at: Coordinate) -> bool {
        if self.state(at) != CellState::Unknown {
            return false;
        }
        self.set_state(at, CellState::Queued);
        self.queue.push_back(at);
        true
    }

    /// Enqueue each of `cells` still `Unknown`; queued, completed and mine
    /// cells are skipped.
    pub fn enqueue_safe(&mut self, cells: &[Coordinate]) {
        for &at in cells {
            self.enqueue(at);
        }
    }

    /// Remove the queue front. A popped cell that is still `Queued` goes back
    /// to `Unknown`; a cell confirmed as a mine while queued keeps `Mine`.
    pub fn dequeue(&mut self) -> Option<Coordinate> {
        let at = self.queue.pop_front()?;
        if self.state(at) == CellState::Queued {
            self.set_state(at, CellState::Unknown);
        }
        Some(at)
    }

    pub fn peek(&self) -> Option<Coordinate> {
        self.queue.front().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_queue_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_queued(&self, at: Coordinate) -> bool {
        self.state(at) == CellState::Queued
    }

    pub fn is_completed(&self, at: Coordinate) -> bool {
        self.state(at) == CellState::Completed
    }

    pub fn complete(&mut self, at: Coordinate) {
        if !self.is_mine(at) {
            self.set_state(at, CellState::Completed);
        }
    }

    pub fn count_mines(&self, cells: &[Coordinate]) -> usize {
        cells.iter().filter(|&&at| self.is_mine(at)).count()
    }
}
