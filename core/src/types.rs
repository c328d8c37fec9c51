use core::fmt;
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::GameError;

/// Single coordinate axis used for the grid side length and positions.
pub type Coord = u8;

/// Grid position `(row, col)`, row 0 at the top.
pub type Coord2 = (Coord, Coord);

/// Points, used for scores, score deltas and undo penalties.
pub type Score = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Direction tiles slide towards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Whether lines run along rows (as opposed to columns) for this direction.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(GameError::InvalidDirection(s.to_owned())),
        }
    }
}

/// Iterates the coordinates of one line, from the edge tiles slide towards to the opposite edge.
pub(crate) fn line_coords(
    size: Coord,
    direction: Direction,
    index: Coord,
) -> impl Iterator<Item = Coord2> {
    let last = size.saturating_sub(1);
    (0..size).map(move |step| match direction {
        Direction::Left => (index, step),
        Direction::Right => (index, last - step),
        Direction::Up => (step, index),
        Direction::Down => (last - step, index),
    })
}

pub trait NeighborIterExt {
    /// Neighbors to the right and below, which visits every orthogonal pair exactly once.
    fn iter_forward_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_forward_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (
            Coord::try_from(dim.0).unwrap_or(Coord::MAX),
            Coord::try_from(dim.1).unwrap_or(Coord::MAX),
        );
        NeighborIter::new(index, size)
    }
}

const FORWARD_DISPLACEMENTS: [(Coord, Coord); 2] = [(0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (Coord, Coord), bounds: Coord2) -> Option<Coord2> {
    let next_row = coords.0.checked_add(delta.0)?;
    let next_col = coords.1.checked_add(delta.1)?;
    (next_row < bounds.0 && next_col < bounds.1).then_some((next_row, next_col))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: usize,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = FORWARD_DISPLACEMENTS.get(self.index) {
            self.index += 1;
            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
        None
    }
}
