//! Brute-force enumeration engine.
//!
//! Runs only once the frontier queue is exhausted. Every unopened cell that
//! is not a known mine becomes one bit of a `u32` mask; every mask with the
//! right number of mines is checked against the revealed numbers around
//! those cells. Cells that agree across all valid masks are settled, and if
//! none do, the cell with the best safe-to-mine ratio is guessed.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::{AgentConfig, MAX_ENUMERATION_CELLS};
use crate::error::AgentError;
use crate::knowledge::KnowledgeStore;
use crate::rng::AgentRng;
use crate::types::{BoardState, Coordinate, NeighborCache};

/// State the engine keeps across turns: the seeded RNG for oversized
/// boundaries and the enumeration ceiling.
pub struct BruteForce {
    rng: AgentRng,
    limit: usize,
}

impl BruteForce {
    pub fn new(rng: AgentRng, config: &AgentConfig) -> Self {
        Self {
            rng,
            limit: config.max_enumeration_cells.min(MAX_ENUMERATION_CELLS) as usize,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    fn pick_random(&mut self, cells: &[Coordinate]) -> Coordinate {
        cells[self.rng.gen_range(cells.len())]
    }
}

/// A revealed number next to at least one undetermined cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConstraint {
    /// The revealed number.
    pub hint: u32,
    /// Neighbors already confirmed as mines.
    pub confirmed: u32,
    /// Bit i is set when undetermined cell i is a neighbor.
    pub neighbors: u32,
}

impl CellConstraint {
    #[inline(always)]
    pub fn is_satisfied_by(&self, mask: u32) -> bool {
        self.confirmed + (mask & self.neighbors).count_ones() == self.hint
    }
}

/// Per-cell mine counts over all valid masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub valid: u64,
    pub mine_counts: Vec<u64>,
}

impl Tally {
    pub fn safe_count(&self, i: usize) -> u64 {
        self.valid - self.mine_counts[i]
    }

    pub fn always_mine(&self, i: usize) -> bool {
        self.valid > 0 && self.mine_counts[i] == self.valid
    }

    pub fn always_safe(&self, i: usize) -> bool {
        self.valid > 0 && self.mine_counts[i] == 0
    }
}

/// All unopened cells not yet known to be mines, in row-major order.
pub fn undetermined_cells(board: &BoardState, store: &KnowledgeStore) -> Vec<Coordinate> {
    board
        .coordinates()
        .filter(|&at| board.is_unopened(at) && !store.is_mine(at))
        .collect()
}

/// One constraint per revealed cell adjacent to any of `cells`.
/// `cells` must hold at most 32 coordinates.
pub fn build_constraints(
    board: &BoardState,
    store: &KnowledgeStore,
    nc: &NeighborCache,
    cells: &[Coordinate],
) -> Vec<CellConstraint> {
    let mut seen: HashSet<Coordinate> = HashSet::new();
    let mut constraints = Vec::new();

    for &cell in cells {
        for &constraint_cell in nc.get(cell) {
            let Some(hint) = board.number(constraint_cell) else {
                continue;
            };
            if !seen.insert(constraint_cell) {
                continue;
            }

            let mut confirmed = 0u32;
            let mut neighbors = 0u32;
            for &n in nc.get(constraint_cell) {
                if store.is_mine(n) {
                    confirmed += 1;
                } else if let Some(i) = cells.iter().position(|&c| c == n) {
                    neighbors |= 1 << i;
                }
            }

            constraints.push(CellConstraint {
                hint: hint as u32,
                confirmed,
                neighbors,
            });
        }
    }

    constraints
}

/// Call `visit` with every `n`-bit mask that places exactly `mines` mines and
/// satisfies every constraint.
///
/// Only masks with the right population count are generated (Gosper's hack),
/// which visits the same set as filtering all `2^n` masks.
pub fn for_each_valid_mask(
    n: usize,
    constraints: &[CellConstraint],
    mines: usize,
    mut visit: impl FnMut(u32),
) {
    debug_assert!(n <= MAX_ENUMERATION_CELLS as usize);
    if mines > n {
        return;
    }

    let limit: u64 = 1u64 << n;
    let mut mask: u64 = (1u64 << mines) - 1;
    while mask < limit {
        let m = mask as u32;
        if constraints.iter().all(|c| c.is_satisfied_by(m)) {
            visit(m);
        }
        if mask == 0 {
            break;
        }
        // Next larger integer with the same number of set bits.
        let lowest = mask & mask.wrapping_neg();
        let ripple = mask + lowest;
        mask = (((ripple ^ mask) >> 2) / lowest) | ripple;
    }
}

/// Count, per cell, how many valid masks make it a mine.
pub fn tally_configurations(n: usize, constraints: &[CellConstraint], mines: usize) -> Tally {
    let mut tally = Tally {
        valid: 0,
        mine_counts: vec![0; n],
    };
    for_each_valid_mask(n, constraints, mines, |mask| {
        tally.valid += 1;
        for (i, count) in tally.mine_counts.iter_mut().enumerate() {
            if (mask >> i) & 1 == 1 {
                *count += 1;
            }
        }
    });
    tally
}

/// Index with the highest safe-to-mine ratio. A cell that is never a mine
/// wins at once; ties keep the lowest index.
pub fn safest_index(tally: &Tally) -> usize {
    let mut best: Option<(usize, u64, u64)> = None;
    for (i, &mines) in tally.mine_counts.iter().enumerate() {
        if mines == 0 {
            return i;
        }
        let safe = tally.safe_count(i);
        let better = match best {
            None => true,
            // safe / mines > best_safe / best_mines, without floats
            Some((_, best_safe, best_mines)) => {
                safe as u128 * best_mines as u128 > best_safe as u128 * mines as u128
            }
        };
        if better {
            best = Some((i, safe, mines));
        }
    }
    best.map_or(0, |(i, _, _)| i)
}

/// Settle or guess undetermined cells, then return the queue front.
///
/// Expects an empty queue.
pub fn choose_with_brute_force(
    board: &BoardState,
    store: &mut KnowledgeStore,
    nc: &NeighborCache,
    engine: &mut BruteForce,
) -> Result<Coordinate, AgentError> {
    let cells = undetermined_cells(board, store);
    if cells.is_empty() {
        return Err(AgentError::EmptyFrontier);
    }

    debug!(
        cells = cells.len(),
        mines_remaining = store.mines_remaining(),
        "brute force"
    );

    if cells.len() > engine.limit() {
        let guess = engine.pick_random(&cells);
        debug!(cell = %guess, "too many cells to enumerate, guessing at random");
        store.enqueue(guess);
        return store.peek().ok_or(AgentError::NoCandidate);
    }

    let constraints = build_constraints(board, store, nc, &cells);
    let tally = tally_configurations(cells.len(), &constraints, store.mines_remaining());

    if tally.valid == 0 {
        let guess = engine.pick_random(&cells);
        warn!(cell = %guess, "no mine placement fits the board, guessing at random");
        store.enqueue(guess);
        return store.peek().ok_or(AgentError::NoCandidate);
    }

    for (i, &cell) in cells.iter().enumerate() {
        if tally.always_mine(i) {
            store.mark_mine(cell);
        } else if tally.always_safe(i) {
            store.enqueue(cell);
        }
    }

    if store.is_queue_empty() {
        let i = safest_index(&tally);
        debug!(
            cell = %cells[i],
            safe = tally.safe_count(i),
            mine = tally.mine_counts[i],
            valid = tally.valid,
            "no certain cell, guessing the safest"
        );
        store.enqueue(cells[i]);
    }

    store.peek().ok_or(AgentError::NoCandidate)
}
