use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of tiles, indexed by `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
    bomb_count: CellCount,
}

impl Board {
    /// Builds a fresh board, asking `placement` where the bombs go.
    pub fn generate(config: GameConfig, placement: impl BombPlacement) -> Result<Self> {
        config.validate()?;
        let coords = placement.place(config);
        Self::from_bomb_coords(config, &coords)
    }

    pub fn from_bomb_coords(config: GameConfig, bomb_coords: &[Coord2]) -> Result<Self> {
        config.validate()?;

        let mut tiles = Array2::from_shape_fn(config.size.to_nd_index(), |(x, y)| {
            // both axes fit in `Coord` since the shape came from a `Coord2`
            Tile::hidden((x as Coord, y as Coord))
        });

        let mut placed: CellCount = 0;
        for &coords in bomb_coords {
            if coords.0 >= config.width() || coords.1 >= config.height() {
                return Err(GameError::InvalidCoords);
            }
            let tile = &mut tiles[coords.to_nd_index()];
            if !tile.is_bomb() {
                *tile = tile.with_bomb();
                placed += 1;
            }
        }

        if placed != config.bombs || bomb_coords.len() != usize::from(config.bombs) {
            return Err(GameError::PlacementMismatch {
                expected: config.bombs,
                actual: placed,
            });
        }

        let mut board = Self {
            tiles,
            bomb_count: placed,
        };
        board.fill_adjacent_counts();

        log::debug!(
            "generated {}x{} board with {} bombs",
            config.width(),
            config.height(),
            placed
        );
        Ok(board)
    }

    fn fill_adjacent_counts(&mut self) {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                let coords = (x, y);
                if !self[coords].is_bomb() {
                    let count = self.count_adjacent_bombs(coords);
                    self.replace(self[coords].with_adjacent_bombs(count));
                }
            }
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.bomb_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.size();
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.tiles.dim();
        (width as Coord, height as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.bomb_count
    }

    pub fn get(&self, coords: Coord2) -> Option<&Tile> {
        self.tiles.get(coords.to_nd_index())
    }

    /// All tiles, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.t().into_iter()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.count_tiles(|tile| tile.is_revealed())
    }

    pub fn flagged_count(&self) -> CellCount {
        self.count_tiles(|tile| tile.is_flagged())
    }

    fn count_tiles(&self, predicate: impl Fn(&Tile) -> bool) -> CellCount {
        self.tiles.iter().filter(|tile| predicate(tile)).count() as CellCount
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    pub(crate) fn count_adjacent_bombs(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Tile::is_bomb)
    }

    pub(crate) fn count_adjacent_flags(&self, coords: Coord2) -> u8 {
        self.count_neighbors(coords, Tile::is_flagged)
    }

    fn count_neighbors(&self, coords: Coord2, predicate: impl Fn(&Tile) -> bool) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords)
            .filter(|&pos| predicate(&self[pos]))
            .count() as u8
    }

    /// Positions whose tile differs between `self` and `other`, row by row.
    ///
    /// Boards of different sizes share no positions worth comparing, every position of `self` is reported.
    pub fn changed_tiles<'a>(&'a self, other: &'a Board) -> impl Iterator<Item = Coord2> + 'a {
        let same_shape = self.size() == other.size();
        self.tiles()
            .filter(move |tile| !same_shape || other[tile.coords()] != **tile)
            .map(Tile::coords)
    }

    pub(crate) fn replace(&mut self, tile: Tile) {
        self.tiles[tile.coords().to_nd_index()] = tile;
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
