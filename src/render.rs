//! Text rendering for diagnostics. Output only ever goes to `tracing`.

use crate::harness::MineLayout;
use crate::knowledge::KnowledgeStore;
use crate::types::BoardState;

/// The agent's view: `+` confirmed mine, `?` unopened, digits for hints.
pub fn render_view(board: &BoardState, store: &KnowledgeStore) -> String {
    let mut out = String::with_capacity(board.height * (board.width + 1));
    for at in board.coordinates() {
        if store.is_mine(at) {
            out.push('+');
        } else {
            match board.number(at) {
                // Hints never exceed 8.
                Some(n) => out.push(char::from_digit(u32::from(n), 10).unwrap_or('#')),
                None => out.push('?'),
            }
        }
        if at.column + 1 == board.width {
            out.push('\n');
        }
    }
    out
}

/// True mine layout: `+` mine, `-` safe.
pub fn render_layout(layout: &MineLayout) -> String {
    let mut out = String::with_capacity(layout.height * (layout.width + 1));
    for row in 0..layout.height {
        for column in 0..layout.width {
            out.push(if layout.get(row, column) { '+' } else { '-' });
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    #[test]
    fn test_render_view() {
        let board = BoardState::from_rows(&[vec![-1, 1], vec![-1, 0]]).unwrap();
        let mut store = KnowledgeStore::new(2, 2, 1);
        store.mark_mine(Coordinate::new(0, 0));
        assert_eq!(render_view(&board, &store), "+1\n?0\n");
    }

    #[test]
    fn test_render_layout() {
        let mut layout = MineLayout::new(2, 3);
        layout.set(0, 2, true);
        layout.set(1, 0, true);
        assert_eq!(render_layout(&layout), "--+\n+--\n");
    }
}
