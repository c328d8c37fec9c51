use std::collections::VecDeque;

use super::*;

/// Replays a fixed list of placements, for tests and recorded games.
///
/// A placement whose cell is no longer empty is skipped. Once the script runs out nothing more is spawned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedSpawner {
    placements: VecDeque<(Coord2, Tile)>,
}

impl ScriptedSpawner {
    pub fn new(placements: impl IntoIterator<Item = (Coord2, Tile)>) -> Self {
        Self {
            placements: placements.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.placements.len()
    }
}

impl TileSpawner for ScriptedSpawner {
    fn spawn(&mut self, empty: &[Coord2]) -> Option<(Coord2, Tile)> {
        while let Some((coords, tile)) = self.placements.pop_front() {
            if empty.contains(&coords) {
                return Some((coords, tile));
            }
            log::warn!("Scripted placement {:?} is not empty, skipped", coords);
        }
        None
    }
}
