use crate::*;
pub use random::*;
pub use scripted::*;

mod random;
mod scripted;

/// Source of the tile inserted after every successful move.
pub trait TileSpawner {
    /// Picks one of the `empty` cells and the tile to put there, or `None` when there is no room.
    fn spawn(&mut self, empty: &[Coord2]) -> Option<(Coord2, Tile)>;
}

impl<T: TileSpawner + ?Sized> TileSpawner for &mut T {
    fn spawn(&mut self, empty: &[Coord2]) -> Option<(Coord2, Tile)> {
        (**self).spawn(empty)
    }
}

impl<T: TileSpawner + ?Sized> TileSpawner for Box<T> {
    fn spawn(&mut self, empty: &[Coord2]) -> Option<(Coord2, Tile)> {
        (**self).spawn(empty)
    }
}
