use core::fmt;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// A grid cell: empty, or a power of two of at least 2.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(u32);

impl Tile {
    pub const EMPTY: Self = Self(0);
    pub const TWO: Self = Self(2);
    pub const FOUR: Self = Self(4);

    /// Largest value that can still be doubled without overflowing.
    pub const MAX_MERGEABLE: u32 = 1 << 30;

    pub fn new(value: u32) -> Result<Self> {
        if Self::is_valid_value(value) {
            Ok(Self(value))
        } else {
            Err(GameError::InvalidTile(value))
        }
    }

    pub const fn is_valid_value(value: u32) -> bool {
        value == 0 || (value >= 2 && value.is_power_of_two())
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn merges_with(self, other: Self) -> bool {
        !self.is_empty() && self.0 == other.0 && self.0 <= Self::MAX_MERGEABLE
    }

    pub const fn doubled(self) -> Self {
        Self(self.0 << 1)
    }
}

impl TryFrom<u32> for Tile {
    type Error = GameError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tile> for u32 {
    fn from(tile: Tile) -> Self {
        tile.0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str(".")
        } else {
            fmt::Display::fmt(&self.0, f)
        }
    }
}
