use serde::{Deserialize, Serialize};

/// Player-side state of a single cell, stored by the session.
///
/// A cell is in exactly one of these states, so it can never be flagged and
/// revealed at the same time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a presentation layer is allowed to know about one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    /// Only known once the cell is revealed or the game is over.
    pub is_mine: Option<bool>,
    /// Only known for revealed non-mine cells.
    pub adjacent_mine_count: Option<u8>,
}
