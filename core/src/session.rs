use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Lost
/// - Playing -> Won
///
/// Only a reset, which brings a whole new board, leads back to `Playing`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Playing,
    Lost,
    Won,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::Playing
    }
}

/// Full mutable state of one round: the board plus everything the player did to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    status: GameStatus,
    triggered_mine: Option<Coord2>,
}

impl Session {
    pub fn new(board: Board) -> Self {
        let size = board.size();
        Self {
            board,
            cells: Array2::default(size.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            status: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn generate<G: BoardGenerator>(config: GameConfig, generator: G) -> Result<Self> {
        generator.generate(config).map(Self::new)
    }

    /// Starts over with a freshly generated board of the same configuration.
    ///
    /// Legal from any status. On error the current round is kept untouched.
    pub fn reset<G: BoardGenerator>(&mut self, generator: G) -> Result<()> {
        let board = generator.generate(self.config())?;
        log::debug!("Reset from {:?}", self.status);
        *self = Self::new(board);
        Ok(())
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> GameConfig {
        self.board.game_config()
    }

    pub fn size(&self) -> Coord2 {
        self.board.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.board.mine_count()
    }

    /// Mines minus flags, negative when there are more flags than mines
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Cells not revealed yet, flagged ones included
    pub fn hidden_count(&self) -> CellCount {
        self.board.total_cells() - self.revealed_count
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    /// The mine that ended a lost round
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// Player-visible view of a cell. Mines are disclosed once revealed or after the
    /// round is over, counts only for revealed cells.
    pub fn cell_view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.board.validate_coords(coords)?;
        let state = self.cells[coords.to_nd_index()];
        let revealed = state == CellState::Revealed;

        Ok(CellView {
            revealed,
            flagged: state == CellState::Flagged,
            is_mine: (revealed || self.is_finished()).then(|| self.board.contains_mine(coords)),
            adjacent_mine_count: if revealed {
                self.board.adjacent_mine_count(coords)
            } else {
                None
            },
        })
    }

    pub fn open_cell(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(coords)?;
        if self.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = reveal::reveal_cell(&self.board, &mut self.cells, coords);
        self.apply_reveal(outcome, coords);
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use CellState::*;
        use MarkOutcome::*;

        let coords = self.board.validate_coords(coords)?;
        if self.is_finished() {
            return Ok(NoChange);
        }

        Ok(match self.cells[coords.to_nd_index()] {
            Hidden => {
                self.cells[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.cells[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed => NoChange,
        })
    }

    /// Read-only, allowed in any status.
    pub fn preview_neighborhood(&self, coords: Coord2) -> Result<PreviewResult> {
        let coords = self.board.validate_coords(coords)?;
        Ok(chord::preview_neighborhood(&self.board, &self.cells, coords))
    }

    /// Opens the neighbourhood described by `preview`. A no-op unless the preview was
    /// safe, so this path can never lose the game.
    pub fn commit_neighborhood_open(&mut self, preview: &PreviewResult) -> Result<RevealOutcome> {
        let coords = self.board.validate_coords(preview.target())?;
        if self.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let outcome = chord::commit_neighborhood_open(&self.board, &mut self.cells, preview);
        self.apply_reveal(outcome, coords);
        Ok(outcome)
    }

    fn apply_reveal(&mut self, outcome: RevealOutcome, coords: Coord2) {
        match outcome {
            RevealOutcome::NoChange => {}
            RevealOutcome::MineHit => {
                self.revealed_count += 1;
                self.triggered_mine = Some(coords);
                self.end_game(GameStatus::Lost);
            }
            RevealOutcome::SafeOpened(count) => {
                self.revealed_count += count;
                if self.is_cleared() {
                    self.end_game(GameStatus::Won);
                }
            }
        }
    }

    /// Won once the hidden cells are exactly as many as the mines.
    ///
    /// Any revealed mine ends the round first, so a matching count means the hidden
    /// cells are the mines themselves.
    fn is_cleared(&self) -> bool {
        let cleared = self.hidden_count() == self.board.mine_count();
        debug_assert!(
            !cleared
                || self
                    .board
                    .iter_mines()
                    .all(|pos| self.cells[pos.to_nd_index()].is_unrevealed())
        );
        cleared
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }
        log::debug!("Game ended: {:?}", status);
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> Session {
        Session::new(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn open_mine_loses_and_records_trigger() {
        let mut session = session((2, 2), &[(0, 0)]);

        assert_eq!(session.open_cell((0, 0)).unwrap(), RevealOutcome::MineHit);
        assert_eq!(session.status(), GameStatus::Lost);
        assert_eq!(session.triggered_mine(), Some((0, 0)));
        assert_eq!(session.revealed_count(), 1);
    }

    #[test]
    fn finished_round_ignores_actions() {
        let mut session = session((3, 1), &[(0, 0)]);
        session.open_cell((0, 0)).unwrap();

        assert_eq!(session.open_cell((2, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(session.toggle_flag((1, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(session.cell_at((2, 0)).unwrap(), CellState::Hidden);
        assert_eq!(session.status(), GameStatus::Lost);
    }

    #[test]
    fn revealing_last_safe_cell_wins() {
        let mut session = session((3, 1), &[(0, 0)]);

        session.open_cell((1, 0)).unwrap();
        assert_eq!(session.status(), GameStatus::Playing);
        session.open_cell((2, 0)).unwrap();

        assert_eq!(session.status(), GameStatus::Won);
        assert_eq!(session.hidden_count(), 1);
    }

    #[test]
    fn toggle_flag_round_trips_and_counts() {
        let mut session = session((2, 2), &[(1, 1)]);

        assert_eq!(session.toggle_flag((0, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(session.flagged_count(), 1);
        assert_eq!(session.mines_left(), 0);
        assert_eq!(session.toggle_flag((0, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(session.flagged_count(), 0);
        assert_eq!(session.cell_at((0, 1)).unwrap(), CellState::Hidden);
    }

    #[test]
    fn revealed_cell_cannot_be_flagged() {
        let mut session = session((2, 2), &[(1, 1)]);
        session.open_cell((0, 0)).unwrap();

        assert_eq!(session.toggle_flag((0, 0)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(session.flagged_count(), 0);
    }

    #[test]
    fn out_of_bounds_is_rejected_everywhere() {
        let mut session = session((2, 2), &[(1, 1)]);
        let err = GameError::OutOfBounds { x: 2, y: 0 };

        assert_eq!(session.open_cell((2, 0)), Err(err));
        assert_eq!(session.toggle_flag((2, 0)), Err(err));
        assert_eq!(session.cell_view((2, 0)), Err(err));
        assert_eq!(session.preview_neighborhood((2, 0)), Err(err));
    }

    #[test]
    fn cell_view_hides_mines_while_playing() {
        let mut session = session((3, 1), &[(2, 0)]);

        let hidden = session.cell_view((2, 0)).unwrap();
        assert_eq!(hidden.is_mine, None);
        assert_eq!(hidden.adjacent_mine_count, None);

        session.open_cell((1, 0)).unwrap();
        let opened = session.cell_view((1, 0)).unwrap();
        assert_eq!(opened.is_mine, Some(false));
        assert_eq!(opened.adjacent_mine_count, Some(1));

        session.open_cell((2, 0)).unwrap();
        let unopened = session.cell_view((0, 0)).unwrap();
        assert!(!unopened.revealed);
        assert_eq!(unopened.is_mine, Some(false));
        assert_eq!(unopened.adjacent_mine_count, None);
        assert_eq!(session.cell_view((2, 0)).unwrap().is_mine, Some(true));
    }

    #[test]
    fn commit_after_finish_is_noop() {
        let mut session = session((4, 4), &[(3, 3)]);
        let preview = session.preview_neighborhood((0, 0)).unwrap();
        session.open_cell((3, 3)).unwrap();

        assert_eq!(
            session.commit_neighborhood_open(&preview).unwrap(),
            RevealOutcome::NoChange
        );
        assert_eq!(session.cell_at((0, 0)).unwrap(), CellState::Hidden);
    }

    #[test]
    fn commit_can_win() {
        let mut session = session((4, 1), &[(3, 0)]);

        let preview = session.preview_neighborhood((0, 0)).unwrap();
        assert!(preview.is_safe());
        let outcome = session.commit_neighborhood_open(&preview).unwrap();

        assert_eq!(outcome, RevealOutcome::SafeOpened(3));
        assert_eq!(session.status(), GameStatus::Won);
    }

    #[test]
    fn reset_starts_fresh_round() {
        let board = Board::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut session = Session::new(board.clone());
        session.toggle_flag((1, 1)).unwrap();
        session.open_cell((0, 0)).unwrap();

        session.reset(FixedBoardGenerator::new(board)).unwrap();

        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(session.flagged_count(), 0);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.triggered_mine(), None);
        assert_eq!(session.cell_at((1, 1)).unwrap(), CellState::Hidden);
    }

    #[test]
    fn failed_reset_keeps_round() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.open_cell((1, 1)).unwrap();
        let other = Board::from_mine_coords((3, 3), &[(0, 0)]).unwrap();

        assert!(session.reset(FixedBoardGenerator::new(other)).is_err());
        assert_eq!(session.revealed_count(), 1);
    }
}
