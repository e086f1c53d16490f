use super::*;

/// Picks `bombs` distinct cells uniformly at random out of the whole board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomPlacement {
    seed: u64,
}

impl RandomPlacement {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BombPlacement for RandomPlacement {
    fn place(self, config: GameConfig) -> Vec<Coord2> {
        use rand::prelude::*;

        let width = usize::from(config.width());
        let total_cells = usize::from(config.total_cells());
        let bombs = usize::from(config.bombs);

        if bombs > total_cells {
            log::warn!(
                "Cannot place {} bombs on {} cells, filling the board instead",
                bombs,
                total_cells
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let coords: Vec<Coord2> =
            rand::seq::index::sample(&mut rng, total_cells, bombs.min(total_cells))
                .into_iter()
                .filter_map(|index| {
                    let x = Coord::try_from(index % width).ok()?;
                    let y = Coord::try_from(index / width).ok()?;
                    Some((x, y))
                })
                .collect();

        log::trace!("seed {} placed bombs at {:?}", self.seed, coords);
        coords
    }
}
