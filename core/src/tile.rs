use serde::{Deserialize, Serialize};

use crate::{Coord, Coord2};

/// One cell of the board.
///
/// Tiles are plain values: revealing or flagging builds a new tile that replaces the old one, so an earlier
/// board snapshot keeps seeing the previous state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    x: Coord,
    y: Coord,
    is_bomb: bool,
    adjacent_bombs: Option<u8>,
    revealed: bool,
    flagged: bool,
}

impl Tile {
    pub(crate) const fn hidden((x, y): Coord2) -> Self {
        Self {
            x,
            y,
            is_bomb: false,
            adjacent_bombs: None,
            revealed: false,
            flagged: false,
        }
    }

    pub const fn x(&self) -> Coord {
        self.x
    }

    pub const fn y(&self) -> Coord {
        self.y
    }

    pub const fn coords(&self) -> Coord2 {
        (self.x, self.y)
    }

    pub const fn is_bomb(&self) -> bool {
        self.is_bomb
    }

    /// Number of bombs around a safe tile, `None` for bombs.
    pub const fn adjacent_bombs(&self) -> Option<u8> {
        self.adjacent_bombs
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Revealed safe tile with no bombs around it.
    pub const fn is_blank(&self) -> bool {
        self.revealed && matches!(self.adjacent_bombs, Some(0))
    }

    pub(crate) const fn with_bomb(self) -> Self {
        Self {
            is_bomb: true,
            adjacent_bombs: None,
            ..self
        }
    }

    pub(crate) const fn with_adjacent_bombs(self, count: u8) -> Self {
        Self {
            adjacent_bombs: Some(count),
            ..self
        }
    }

    pub(crate) const fn into_revealed(self) -> Self {
        Self {
            revealed: true,
            ..self
        }
    }

    pub(crate) const fn with_flag(self, flagged: bool) -> Self {
        Self { flagged, ..self }
    }
}
