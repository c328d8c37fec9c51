use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::*;

/// Persistence collaborator used by [`Session`].
pub trait GameStore {
    /// The saved game, `None` when there is none. Undecodable data is reported as
    /// [`GameError::CorruptPersistedState`].
    fn load_state(&self) -> Result<Option<GameState>>;
    fn save_state(&mut self, state: &GameState) -> Result<()>;
    /// Forgets the saved game only.
    fn clear_state(&mut self) -> Result<()>;

    /// Best score ever saved, 0 when there is none.
    fn load_best_score(&self) -> Result<Score>;
    fn save_best_score(&mut self, score: Score) -> Result<()>;

    /// Saved settings, the defaults when there are none.
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&mut self, settings: &Settings) -> Result<()>;

    fn load_statistics(&self) -> Result<Statistics>;
    fn save_statistics(&mut self, statistics: &Statistics) -> Result<()>;

    /// Removes everything this store has saved.
    fn clear(&mut self) -> Result<()>;
}

/// String key/value storage underneath a [`JsonStore`].
pub trait StorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Keeps everything in memory, mostly useful for tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryBackend {
    entries: BTreeMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// [`GameStore`] that keeps one JSON document per key, with keys prefixed by a namespace.
#[derive(Clone, Debug)]
pub struct JsonStore<B> {
    backend: B,
    namespace: String,
}

impl<B: StorageBackend> JsonStore<B> {
    pub const DEFAULT_NAMESPACE: &'static str = "2048-game";

    pub const GAME_STATE_KEY: &'static str = "gameState";
    pub const BEST_SCORE_KEY: &'static str = "bestScore";
    pub const SETTINGS_KEY: &'static str = "settings";
    pub const STATISTICS_KEY: &'static str = "statistics";

    pub fn new(backend: B) -> Self {
        Self::with_namespace(backend, Self::DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(backend: B, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}-{}", self.namespace, key)
    }

    fn read_json<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>> {
        match self.backend.read(&self.namespaced(key))? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write_json<V: Serialize>(&mut self, key: &str, value: &V) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.backend.write(&self.namespaced(key), &text)
    }
}

impl<B: StorageBackend> GameStore for JsonStore<B> {
    fn load_state(&self) -> Result<Option<GameState>> {
        self.read_json(Self::GAME_STATE_KEY).map_err(|err| match err {
            GameError::Serialization(reason) => GameError::CorruptPersistedState(reason),
            other => other,
        })
    }

    fn save_state(&mut self, state: &GameState) -> Result<()> {
        self.write_json(Self::GAME_STATE_KEY, state)
    }

    fn clear_state(&mut self) -> Result<()> {
        let key = self.namespaced(Self::GAME_STATE_KEY);
        self.backend.remove(&key)
    }

    fn load_best_score(&self) -> Result<Score> {
        Ok(self.read_json(Self::BEST_SCORE_KEY)?.unwrap_or(0))
    }

    fn save_best_score(&mut self, score: Score) -> Result<()> {
        self.write_json(Self::BEST_SCORE_KEY, &score)
    }

    fn load_settings(&self) -> Result<Settings> {
        Ok(self.read_json(Self::SETTINGS_KEY)?.unwrap_or_default())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<()> {
        self.write_json(Self::SETTINGS_KEY, settings)
    }

    fn load_statistics(&self) -> Result<Statistics> {
        Ok(self.read_json(Self::STATISTICS_KEY)?.unwrap_or_default())
    }

    fn save_statistics(&mut self, statistics: &Statistics) -> Result<()> {
        self.write_json(Self::STATISTICS_KEY, statistics)
    }

    fn clear(&mut self) -> Result<()> {
        for key in [
            Self::GAME_STATE_KEY,
            Self::BEST_SCORE_KEY,
            Self::SETTINGS_KEY,
            Self::STATISTICS_KEY,
        ] {
            let key = self.namespaced(key);
            self.backend.remove(&key)?;
        }
        Ok(())
    }
}
