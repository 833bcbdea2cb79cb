//! Core data types for the agent.
//!
//! All grids use flat `Vec` storage in row-major layout:
//! `cells[row * width + column]`.

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Board value of a cell that has not been revealed yet.
pub const UNOPENED_FIELD: i32 = -1;

/// A cell position, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The revealed board as the harness presents it each turn.
///
/// Negative values mark unopened cells; a non-negative value is the number of
/// mines among that cell's neighbors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub height: usize,
    pub width: usize,
    pub cells: Vec<i32>,
}

impl BoardState {
    /// Create a board with every cell unopened.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![UNOPENED_FIELD; height * width],
        }
    }

    /// Wrap a flat row-major buffer, checking its length.
    pub fn from_flat(height: usize, width: usize, cells: Vec<i32>) -> Result<Self, AgentError> {
        if cells.len() != height * width {
            return Err(AgentError::BoardShape {
                height,
                width,
                cells: cells.len(),
            });
        }
        Ok(Self { height, width, cells })
    }

    /// Build a board from nested rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<i32>]) -> Result<Self, AgentError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let cells: Vec<i32> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|row| row.len() != width) {
            return Err(AgentError::BoardShape {
                height,
                width,
                cells: cells.len(),
            });
        }
        Ok(Self { height, width, cells })
    }

    #[inline(always)]
    pub fn get(&self, at: Coordinate) -> i32 {
        self.cells[at.row * self.width + at.column]
    }

    #[inline(always)]
    pub fn set(&mut self, at: Coordinate, val: i32) {
        self.cells[at.row * self.width + at.column] = val;
    }

    #[inline(always)]
    pub fn in_bounds(&self, at: Coordinate) -> bool {
        at.row < self.height && at.column < self.width
    }

    /// Anything that is not a hint in `0..=8` counts as unopened.
    #[inline(always)]
    pub fn is_unopened(&self, at: Coordinate) -> bool {
        self.number(at).is_none()
    }

    /// Revealed hint at `at`, or `None` while the cell is unopened.
    #[inline(always)]
    pub fn number(&self, at: Coordinate) -> Option<u8> {
        hint(self.get(at))
    }

    /// All coordinates in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> {
        let width = self.width;
        (0..self.height * width).map(move |i| Coordinate::new(i / width, i % width))
    }

    pub fn opened_count(&self) -> usize {
        self.cells.iter().filter(|&&v| hint(v).is_some()).count()
    }
}

#[inline(always)]
fn hint(value: i32) -> Option<u8> {
    u8::try_from(value).ok().filter(|&n| n <= 8)
}

/// Up to 8 neighbors of `at`, clipped to a `height` x `width` board.
///
/// Order is column-major around the cell: left column top to bottom, then the
/// cells directly above and below, then the right column.
pub fn neighbors(at: Coordinate, height: usize, width: usize) -> Vec<Coordinate> {
    let mut out = Vec::with_capacity(8);
    for dc in -1i64..=1 {
        for dr in -1i64..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = at.row as i64 + dr;
            let c = at.column as i64 + dc;
            if r >= 0 && r < height as i64 && c >= 0 && c < width as i64 {
                out.push(Coordinate::new(r as usize, c as usize));
            }
        }
    }
    out
}

/// Pre-computed neighbor lists for every cell of a board.
pub struct NeighborCache {
    pub height: usize,
    pub width: usize,
    /// Flat storage of all neighbor coordinates.
    data: Vec<Coordinate>,
    /// offsets[i]..offsets[i+1] is the slice of `data` for cell i.
    offsets: Vec<usize>,
}

impl NeighborCache {
    pub fn new(height: usize, width: usize) -> Self {
        let total = height * width;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for row in 0..height {
            for column in 0..width {
                offsets.push(data.len());
                data.extend(neighbors(Coordinate::new(row, column), height, width));
            }
        }
        offsets.push(data.len()); // sentinel

        Self {
            height,
            width,
            data,
            offsets,
        }
    }

    #[inline(always)]
    pub fn get(&self, at: Coordinate) -> &[Coordinate] {
        let idx = at.row * self.width + at.column;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}
