use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Decides where the bombs of a new board go.
///
/// The board validates whatever comes back: every position must be in bounds and there must be exactly
/// `config.bombs` distinct ones.
pub trait BombPlacement {
    fn place(self, config: GameConfig) -> Vec<Coord2>;
}

/// Closures receive `(width, height, bombs)`.
impl<F> BombPlacement for F
where
    F: FnOnce(Coord, Coord, CellCount) -> Vec<Coord2>,
{
    fn place(self, config: GameConfig) -> Vec<Coord2> {
        let (width, height) = config.size;
        self(width, height, config.bombs)
    }
}

/// Always places bombs on the same positions, ignoring the requested count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedPlacement(Vec<Coord2>);

impl FixedPlacement {
    pub fn new(coords: impl Into<Vec<Coord2>>) -> Self {
        Self(coords.into())
    }
}

impl BombPlacement for FixedPlacement {
    fn place(self, _config: GameConfig) -> Vec<Coord2> {
        self.0
    }
}
