#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use chord::PreviewResult;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod cell;
mod chord;
mod error;
mod generator;
mod reveal;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that the board is non-empty and leaves at least one safe cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        Self::new_unchecked(size, mines).validate()
    }

    pub fn validate(self) -> Result<Self> {
        let (width, height) = self.size;
        if width == 0 || height == 0 || self.mines >= self.total_cells() {
            Err(GameError::InvalidConfig {
                width,
                height,
                mines: self.mines,
            })
        } else {
            Ok(self)
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Mine layout of one round together with the adjacency counts derived from it.
///
/// Immutable once built: both grids are computed at construction and never change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl Board {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (dim_x, dim_y) = mine_mask.dim();
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let size = (saturate_coord(dim_x), saturate_coord(dim_y));
        let config = GameConfig::new_unchecked(size, saturate_count(mine_count));
        if usize::from(size.0) != dim_x || usize::from(size.1) != dim_y {
            return Err(GameError::InvalidConfig {
                width: config.size.0,
                height: config.size.1,
                mines: config.mines,
            });
        }
        let config = config.validate()?;

        let adjacent = Array2::from_shape_fn((dim_x, dim_y), |(x, y)| {
            let coords = (x as Coord, y as Coord);
            if mine_mask[coords.to_nd_index()] {
                0
            } else {
                mine_mask
                    .iter_neighbors(coords)
                    .filter(|&pos| mine_mask[pos.to_nd_index()])
                    .count() as u8
            }
        });

        Ok(Self {
            mine_mask,
            adjacent,
            mine_count: config.mines,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidConfig {
                width: size.0,
                height: size.1,
                mines: saturate_count(mine_coords.len()),
            });
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &(x, y) in mine_coords {
            if x >= size.0 || y >= size.1 {
                return Err(GameError::OutOfBounds { x, y });
            }
            mine_mask[(x, y).to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                x: coords.0,
                y: coords.1,
            })
        }
    }

    pub fn size(&self) -> Coord2 {
        types::dim_to_size(self.mine_mask.dim())
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mines around `coords`, `None` when the cell is a mine itself.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> Option<u8> {
        if self[coords] {
            None
        } else {
            Some(self.adjacent[coords.to_nd_index()])
        }
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }

    pub fn iter_neighborhood(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighborhood(coords)
    }

    /// Coordinates of every mine, column by column.
    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((x, y), _)| (x as Coord, y as Coord))
    }
}

impl Index<Coord2> for Board {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

fn saturate_coord(value: usize) -> Coord {
    value.try_into().unwrap_or(Coord::MAX)
}

fn saturate_count(value: usize) -> CellCount {
    value.try_into().unwrap_or(CellCount::MAX)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Target was already revealed, flagged, or the game is over
    NoChange,
    MineHit,
    /// Number of cells newly revealed, including flood-filled ones
    SafeOpened(CellCount),
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            MineHit => true,
            SafeOpened(_) => true,
        }
    }

    pub const fn opened_count(self) -> CellCount {
        match self {
            Self::SafeOpened(count) => count,
            _ => 0,
        }
    }
}

/// Used to merge outcomes when opening several cells at once
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (MineHit, _) => MineHit,
            (_, MineHit) => MineHit,
            (SafeOpened(a), SafeOpened(b)) => SafeOpened(a + b),
            (SafeOpened(a), NoChange) => SafeOpened(a),
            (NoChange, SafeOpened(b)) => SafeOpened(b),
            (NoChange, NoChange) => NoChange,
        }
    }
}
