use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid direction {0:?}, expected one of up, down, left or right")]
    InvalidDirection(String),
    #[error("No move to undo")]
    NoUndoAvailable,
    #[error("Grid shape does not match the configured size")]
    InvalidBoardShape,
    #[error("Invalid tile value {0}, expected zero or a power of two")]
    InvalidTile(u32),
    #[error("Persisted game state is corrupt: {0}")]
    CorruptPersistedState(String),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Could not (de)serialize stored data: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
