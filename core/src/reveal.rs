use alloc::collections::VecDeque;
use ndarray::Array2;

use crate::*;

/// Reveals a single hidden cell, flood-filling outward when it has no adjacent mines.
///
/// Revealed and flagged cells are left alone. A mine is revealed and reported, the
/// caller decides what that means for the game.
pub(crate) fn reveal_cell(
    board: &Board,
    cells: &mut Array2<CellState>,
    coords: Coord2,
) -> RevealOutcome {
    use RevealOutcome::*;

    if cells[coords.to_nd_index()] != CellState::Hidden {
        return NoChange;
    }

    cells[coords.to_nd_index()] = CellState::Revealed;
    match board.adjacent_mine_count(coords) {
        None => {
            log::debug!("Revealed mine at {:?}", coords);
            MineHit
        }
        Some(0) => {
            let flooded = flood_fill(board, cells, coords);
            log::debug!("Revealed {:?} and flood-filled {} cells", coords, flooded);
            SafeOpened(1 + flooded)
        }
        Some(count) => {
            log::debug!("Revealed {:?}, adjacent mines: {}", coords, count);
            SafeOpened(1)
        }
    }
}

/// Breadth-first reveal of the zero-count region around `start`, which must already be revealed.
///
/// The revealed state doubles as the visited marker. Cells with a positive count are
/// revealed but not expanded, mines and flags are never touched. Returns how many
/// cells were newly revealed.
pub(crate) fn flood_fill(board: &Board, cells: &mut Array2<CellState>, start: Coord2) -> CellCount {
    let mut opened: CellCount = 0;
    let mut to_visit = VecDeque::from([start]);

    while let Some(visit_coords) = to_visit.pop_front() {
        for pos in board.iter_neighbors(visit_coords) {
            if cells[pos.to_nd_index()] != CellState::Hidden {
                continue;
            }
            let Some(count) = board.adjacent_mine_count(pos) else {
                continue;
            };

            cells[pos.to_nd_index()] = CellState::Revealed;
            opened += 1;
            log::trace!("Flood opened cell at {:?}, mine count: {}", pos, count);

            if count == 0 {
                to_visit.push_back(pos);
            }
        }
    }

    opened
}
