use alloc::vec::Vec;
use hashbrown::HashSet;
use rand::prelude::*;

use super::*;

/// How mines get picked. Both strategies are uniform over mine subsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Rejection sampling up to half density, shuffling above that
    Auto,
    /// Draw random coordinates into a set until it is full
    Rejection,
    /// Shuffle every coordinate and keep the first `mines`
    Shuffle,
}

/// Purely random placement, reproducible for a given seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    placement: Placement,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            placement: Placement::Auto,
        }
    }

    pub fn with_placement(self, placement: Placement) -> Self {
        Self { placement, ..self }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        use Placement::*;

        let config = config.validate()?;
        let placement = match self.placement {
            Auto if config.mines > config.total_cells() / 2 => Shuffle,
            Auto => Rejection,
            placement => placement,
        };
        log::debug!(
            "Generating {}x{} board with {} mines, seed {}, placement {:?}",
            config.size.0,
            config.size.1,
            config.mines,
            self.seed,
            placement
        );

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mines = if placement == Shuffle {
            place_by_shuffle(&mut rng, config)
        } else {
            place_by_rejection(&mut rng, config)
        };
        for coords in mines {
            mine_mask[coords.to_nd_index()] = true;
        }

        Board::from_mine_mask(mine_mask)
    }
}

fn place_by_rejection(rng: &mut SmallRng, config: GameConfig) -> Vec<Coord2> {
    let (width, height) = config.size;
    let target = usize::from(config.mines);
    let mut mines = HashSet::with_capacity(target);
    let mut draws: u32 = 0;

    while mines.len() < target {
        let x = rng.random_range(0..width);
        let y = rng.random_range(0..height);
        mines.insert((x, y));
        draws += 1;
    }
    log::trace!("Rejection sampling placed {} mines in {} draws", target, draws);

    mines.into_iter().collect()
}

fn place_by_shuffle(rng: &mut SmallRng, config: GameConfig) -> Vec<Coord2> {
    let (width, height) = config.size;
    let mut cells: Vec<Coord2> = (0..width)
        .flat_map(|x| (0..height).map(move |y| (x, y)))
        .collect();

    let (chosen, _) = cells.partial_shuffle(rng, usize::from(config.mines));
    chosen.to_vec()
}
