use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::reveal::reveal_cell;
use crate::*;

/// Safety classification of a 3x3 neighbourhood, handed back to the caller between
/// the press and the release of a neighbourhood open.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResult {
    target: Coord2,
    is_safe: bool,
    affected: SmallVec<[Coord2; 9]>,
}

impl PreviewResult {
    pub fn target(&self) -> Coord2 {
        self.target
    }

    /// No mine in the neighbourhood, the target included.
    pub fn is_safe(&self) -> bool {
        self.is_safe
    }

    /// Unrevealed cells of the neighbourhood, for highlighting only.
    pub fn affected(&self) -> &[Coord2] {
        &self.affected
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.affected.contains(&coords)
    }
}

fn neighborhood_is_safe(board: &Board, target: Coord2) -> bool {
    board
        .iter_neighborhood(target)
        .all(|pos| !board.contains_mine(pos))
}

pub(crate) fn preview_neighborhood(
    board: &Board,
    cells: &Array2<CellState>,
    target: Coord2,
) -> PreviewResult {
    let affected = board
        .iter_neighborhood(target)
        .filter(|&pos| cells[pos.to_nd_index()].is_unrevealed())
        .collect();

    PreviewResult {
        target,
        is_safe: neighborhood_is_safe(board, target),
        affected,
    }
}

/// Opens every hidden cell around the previewed target.
///
/// Refuses unsafe previews. Safety is checked again against the board, so a preview
/// taken on an earlier board cannot open a mine either.
pub(crate) fn commit_neighborhood_open(
    board: &Board,
    cells: &mut Array2<CellState>,
    preview: &PreviewResult,
) -> RevealOutcome {
    if !preview.is_safe {
        return RevealOutcome::NoChange;
    }
    if !neighborhood_is_safe(board, preview.target) {
        log::warn!(
            "Refusing neighbourhood open at {:?}, preview is stale",
            preview.target
        );
        return RevealOutcome::NoChange;
    }

    let outcome = board
        .iter_neighborhood(preview.target)
        .map(|pos| reveal_cell(board, cells, pos))
        .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor);
    debug_assert_ne!(outcome, RevealOutcome::MineHit);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(size: Coord2, mines: &[Coord2]) -> (Board, Array2<CellState>) {
        let board = Board::from_mine_coords(size, mines).unwrap();
        let cells = Array2::default(size.to_nd_index());
        (board, cells)
    }

    #[test]
    fn preview_lists_unrevealed_neighborhood() {
        let (board, mut cells) = setup((4, 4), &[(3, 3)]);
        cells[[0, 0]] = CellState::Revealed;
        cells[[1, 0]] = CellState::Flagged;

        let preview = preview_neighborhood(&board, &cells, (0, 0));

        assert!(preview.is_safe());
        assert_eq!(preview.target(), (0, 0));
        assert_eq!(preview.affected(), &[(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn preview_counts_mine_on_target() {
        let (board, cells) = setup((3, 3), &[(1, 1)]);

        assert!(!preview_neighborhood(&board, &cells, (1, 1)).is_safe());
        assert!(!preview_neighborhood(&board, &cells, (0, 0)).is_safe());
    }

    #[test]
    fn commit_opens_safe_neighborhood_and_floods() {
        let (board, mut cells) = setup((5, 5), &[(4, 4)]);
        let preview = preview_neighborhood(&board, &cells, (0, 0));

        let outcome = commit_neighborhood_open(&board, &mut cells, &preview);

        assert_eq!(outcome, RevealOutcome::SafeOpened(24));
        assert_eq!(cells[[4, 4]], CellState::Hidden);
    }

    #[test]
    fn commit_keeps_flags() {
        let (board, mut cells) = setup((3, 3), &[]);
        cells[[1, 1]] = CellState::Flagged;
        let preview = preview_neighborhood(&board, &cells, (0, 0));

        let outcome = commit_neighborhood_open(&board, &mut cells, &preview);

        assert_eq!(cells[[1, 1]], CellState::Flagged);
        assert_eq!(outcome, RevealOutcome::SafeOpened(8));
    }

    #[test]
    fn commit_refuses_unsafe_preview() {
        let (board, mut cells) = setup((3, 3), &[(2, 2)]);
        let preview = preview_neighborhood(&board, &cells, (1, 1));

        assert!(!preview.is_safe());
        assert_eq!(
            commit_neighborhood_open(&board, &mut cells, &preview),
            RevealOutcome::NoChange
        );
        assert!(cells.iter().all(|&cell| cell == CellState::Hidden));
    }

    #[test]
    fn commit_rechecks_safety_against_board() {
        let (safe_board, cells) = setup((3, 3), &[]);
        let stale = preview_neighborhood(&safe_board, &cells, (1, 1));
        let (mined_board, mut cells) = setup((3, 3), &[(0, 0)]);

        assert!(stale.is_safe());
        assert_eq!(
            commit_neighborhood_open(&mined_board, &mut cells, &stale),
            RevealOutcome::NoChange
        );
        assert!(cells.iter().all(|&cell| cell == CellState::Hidden));
    }
}
