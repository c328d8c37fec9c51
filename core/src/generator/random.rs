use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Chance that a spawned tile is a 4 rather than a 2.
pub const FOUR_PROBABILITY: f64 = 0.1;

/// Places a 2 (or, one time in ten, a 4) on a uniformly chosen empty cell.
#[derive(Clone, Debug)]
pub struct RandomSpawner<R = SmallRng> {
    rng: R,
}

impl RandomSpawner<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSpawner<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TileSpawner for RandomSpawner<R> {
    fn spawn(&mut self, empty: &[Coord2]) -> Option<(Coord2, Tile)> {
        if empty.is_empty() {
            return None;
        }
        let coords = *empty.get(self.rng.random_range(0..empty.len()))?;
        let tile = if self.rng.random_bool(FOUR_PROBABILITY) {
            Tile::FOUR
        } else {
            Tile::TWO
        };
        Some((coords, tile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_spawns_the_same_tiles() {
        let empty = [(0, 0), (0, 1), (1, 0), (1, 1)];
        let mut a = RandomSpawner::from_seed(7);
        let mut b = RandomSpawner::from_seed(7);

        for _ in 0..32 {
            assert_eq!(a.spawn(&empty), b.spawn(&empty));
        }
    }

    #[test]
    fn spawns_only_twos_and_fours_on_empty_cells() {
        let empty = [(2, 3), (3, 1)];
        let mut spawner = RandomSpawner::from_seed(42);
        let mut fours = 0;

        for _ in 0..1000 {
            let (coords, tile) = spawner.spawn(&empty).unwrap();
            assert!(empty.contains(&coords));
            assert!(tile == Tile::TWO || tile == Tile::FOUR);
            if tile == Tile::FOUR {
                fours += 1;
            }
        }

        // roughly one in ten
        assert!((40..=180).contains(&fours), "got {fours} fours");
    }

    #[test]
    fn full_grid_spawns_nothing() {
        assert_eq!(RandomSpawner::from_seed(1).spawn(&[]), None);
    }
}
