//! Local constraint engine.
//!
//! Takes cells off the frontier queue one at a time and applies the two
//! counting rules to each:
//! - a number with exactly that many unopened neighbors makes all of them mines;
//! - a number already matched by confirmed mines makes every other neighbor safe.
//!
//! When the queue runs dry the brute-force engine takes over.

use tracing::trace;

use crate::enumeration::{self, BruteForce};
use crate::error::AgentError;
use crate::knowledge::KnowledgeStore;
use crate::types::{BoardState, Coordinate, NeighborCache};

/// What applying the counting rules to one cell changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalOutcome {
    pub new_mines: usize,
    pub completed: bool,
}

/// Apply both counting rules to the revealed cell `at`.
///
/// Does nothing for a cell that is still unopened.
pub fn apply_local_rules(
    board: &BoardState,
    store: &mut KnowledgeStore,
    nc: &NeighborCache,
    at: Coordinate,
) -> LocalOutcome {
    let mut outcome = LocalOutcome::default();
    let Some(number) = board.number(at) else {
        return outcome;
    };
    let number = number as usize;
    let neighbors = nc.get(at);

    let unopened: Vec<Coordinate> = neighbors
        .iter()
        .copied()
        .filter(|&n| board.is_unopened(n))
        .collect();

    if unopened.len() == number {
        for &n in &unopened {
            if store.mark_mine(n) {
                outcome.new_mines += 1;
            }
        }
    }

    if store.count_mines(neighbors) == number {
        store.enqueue_safe(neighbors);
        store.complete(at);
        outcome.completed = true;
    }

    outcome
}

/// Drain the queue until its front is a cell worth opening, falling back to
/// brute force once it is empty.
pub fn resolve(
    board: &BoardState,
    store: &mut KnowledgeStore,
    nc: &NeighborCache,
    brute_force: &mut BruteForce,
) -> Result<Coordinate, AgentError> {
    loop {
        let Some(at) = store.dequeue() else {
            return enumeration::choose_with_brute_force(board, store, nc, brute_force);
        };

        let outcome = apply_local_rules(board, store, nc, at);
        trace!(
            cell = %at,
            new_mines = outcome.new_mines,
            completed = outcome.completed,
            "looked at cell"
        );

        if let Some(next) = store.peek() {
            if board.is_unopened(next) && !store.is_mine(next) {
                return Ok(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AgentConfig;
    use crate::rng::AgentRng;

    fn board(rows: &[&[i32]]) -> BoardState {
        let rows: Vec<Vec<i32>> = rows.iter().map(|r| r.to_vec()).collect();
        BoardState::from_rows(&rows).unwrap()
    }

    fn brute_force(limit: u32) -> BruteForce {
        BruteForce::new(
            AgentRng::from_seed(7),
            &AgentConfig {
                max_enumeration_cells: limit,
                ..AgentConfig::default()
            },
        )
    }

    #[test]
    fn test_all_mines_rule() {
        // The top 2 has exactly two unopened neighbors.
        let b = board(&[
            &[-1, 2, -1],
            &[1, 2, 1],
            &[0, 0, 0],
        ]);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 2);
        let outcome = apply_local_rules(&b, &mut store, &nc, Coordinate::new(0, 1));
        assert_eq!(outcome.new_mines, 2);
        assert!(store.is_mine(Coordinate::new(0, 0)));
        assert!(store.is_mine(Coordinate::new(0, 2)));
        assert_eq!(store.mines_remaining(), 0);
        assert!(outcome.completed);
    }

    #[test]
    fn test_all_mines_rule_counts_known_mines_once() {
        let b = board(&[
            &[-1, 2, -1],
            &[1, 2, 1],
            &[0, 0, 0],
        ]);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 2);
        store.mark_mine(Coordinate::new(0, 0));
        let outcome = apply_local_rules(&b, &mut store, &nc, Coordinate::new(0, 1));
        assert_eq!(outcome.new_mines, 1);
        assert_eq!(store.mines_remaining(), 0);
    }

    #[test]
    fn test_satisfied_rule_enqueues_and_completes() {
        // (1,1) shows 1 and its single mine at (0,0) is already known.
        let b = board(&[
            &[-1, -1, -1],
            &[-1, 1, -1],
            &[-1, -1, -1],
        ]);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 1);
        store.mark_mine(Coordinate::new(0, 0));
        let center = Coordinate::new(1, 1);
        let outcome = apply_local_rules(&b, &mut store, &nc, center);
        assert!(outcome.completed);
        assert!(store.is_completed(center));
        assert_eq!(store.queue_len(), 7);
        assert!(!store.is_queued(Coordinate::new(0, 0)));
    }

    #[test]
    fn test_unopened_cell_is_ignored() {
        let b = BoardState::new(3, 3);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 1);
        let outcome = apply_local_rules(&b, &mut store, &nc, Coordinate::new(1, 1));
        assert_eq!(outcome, LocalOutcome::default());
        assert!(store.is_queue_empty());
    }

    #[test]
    fn test_resolve_returns_neighbor_of_zero() {
        let mut b = BoardState::new(3, 3);
        let center = Coordinate::new(1, 1);
        b.set(center, 0);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 1);
        store.enqueue(center);

        let chosen = resolve(&b, &mut store, &nc, &mut brute_force(32)).unwrap();
        assert_ne!(chosen, center);
        assert!(b.is_unopened(chosen));
        assert!(nc.get(center).contains(&chosen));
        // The chosen cell stays queued until it has been revealed and examined.
        assert_eq!(store.peek(), Some(chosen));
    }

    #[test]
    fn test_resolve_drains_stale_entries() {
        // Row 0 is revealed, the queue holds only revealed cells and a mine.
        let b = board(&[
            &[0, 1, -1],
            &[0, 1, -1],
            &[0, 1, -1],
        ]);
        let nc = NeighborCache::new(3, 3);
        let mut store = KnowledgeStore::new(3, 3, 1);
        store.enqueue(Coordinate::new(0, 2));
        store.mark_mine(Coordinate::new(0, 2));
        store.enqueue(Coordinate::new(0, 0));

        let chosen = resolve(&b, &mut store, &nc, &mut brute_force(32)).unwrap();
        assert!(b.is_unopened(chosen));
        assert!(!store.is_mine(chosen));
    }
}
