pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;
pub use settings::*;
pub use stats::*;
pub use store::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod grid;
mod session;
mod settings;
mod stats;
mod store;
mod tile;
mod types;

/// Fixed parameters of a game: grid side length, the tile that wins, and the undo penalty.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub size: Coord,
    pub win_tile: Tile,
    pub undo_penalty: UndoPenalty,
}

impl GameConfig {
    pub const MIN_SIZE: Coord = 2;
    pub const MAX_SIZE: Coord = 16;

    pub const fn new_unchecked(size: Coord, win_tile: Tile) -> Self {
        Self {
            size,
            win_tile,
            undo_penalty: UndoPenalty::DEFAULT,
        }
    }

    /// Clamps the size into range; a win tile that is not a power of two of at least 4 becomes 2048.
    pub fn new(size: Coord, win_tile: u32) -> Self {
        let size = size.clamp(Self::MIN_SIZE, Self::MAX_SIZE);
        let win_tile = match Tile::new(win_tile) {
            Ok(tile) if tile.value() >= 4 => tile,
            _ => Tile::new(Settings::DEFAULT_WIN_TILE).unwrap_or(Tile::FOUR),
        };
        Self::new_unchecked(size, win_tile)
    }

    pub const fn with_undo_penalty(self, undo_penalty: UndoPenalty) -> Self {
        Self {
            undo_penalty,
            ..self
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Settings::default().game_config()
    }
}

/// What a call to [`PlayEngine::move_tiles`] ended up doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Nothing slid, or the game is stuck.
    NoMove,
    Moved,
    /// A left move while stuck, taken as an undo.
    Undone,
}

impl MoveOutcome {
    /// Whether this outcome changed the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoMove => false,
            Self::Moved => true,
            Self::Undone => true,
        }
    }
}
