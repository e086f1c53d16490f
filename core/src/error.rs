use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: a {width}x{height} board cannot hold {bombs} bombs")]
    InvalidConfiguration {
        width: Coord,
        height: Coord,
        bombs: CellCount,
    },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Bomb placement yielded {actual} distinct cells, expected {expected}")]
    PlacementMismatch {
        expected: CellCount,
        actual: CellCount,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
