#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod session;
mod tile;
mod types;

/// Board dimensions plus the number of bombs to place on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub bombs: CellCount,
}

impl GameConfig {
    pub const SMALL: Self = Self::new_unchecked((9, 9), 10);
    pub const MEDIUM: Self = Self::new_unchecked((16, 16), 40);
    pub const LARGE: Self = Self::new_unchecked((30, 16), 99);

    pub const MIN_CUSTOM_SIDE: Coord = 9;
    pub const MAX_CUSTOM_SIDE: Coord = 30;
    pub const MIN_CUSTOM_BOMBS: CellCount = 10;
    pub const MAX_CUSTOM_BOMBS: CellCount = 250;

    pub const fn new_unchecked(size: Coord2, bombs: CellCount) -> Self {
        Self { size, bombs }
    }

    /// Validated constructor, fails when the board is empty or has no room for a safe cell.
    pub fn new(size: Coord2, bombs: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(size, bombs);
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration for the custom preset, clamping every value into the slider bounds.
    pub fn custom((width, height): Coord2, bombs: CellCount) -> Self {
        let width = width.clamp(Self::MIN_CUSTOM_SIDE, Self::MAX_CUSTOM_SIDE);
        let height = height.clamp(Self::MIN_CUSTOM_SIDE, Self::MAX_CUSTOM_SIDE);
        let bombs = bombs.clamp(
            Self::MIN_CUSTOM_BOMBS,
            Self::max_custom_bombs((width, height)),
        );
        Self::new_unchecked((width, height), bombs)
    }

    /// Upper slider bound for custom bombs, always leaving at least one safe cell.
    pub const fn max_custom_bombs((width, height): Coord2) -> CellCount {
        let cap = mult(width, height).saturating_sub(1);
        if cap < Self::MAX_CUSTOM_BOMBS {
            cap
        } else {
            Self::MAX_CUSTOM_BOMBS
        }
    }

    pub const fn width(&self) -> Coord {
        self.size.0
    }

    pub const fn height(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.size;
        if width == 0 || height == 0 || self.bombs >= self.total_cells() {
            return Err(GameError::InvalidConfiguration {
                width,
                height,
                bombs: self.bombs,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::SMALL
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// How the remaining-flag counter moves for this outcome.
    pub const fn flag_delta(self) -> i32 {
        match self {
            Self::NoChange => 0,
            Self::Flagged => -1,
            Self::Unflagged => 1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    Lost,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            Lost => true,
            Won => true,
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Lost | Self::Won)
    }
}
