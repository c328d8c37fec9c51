use crate::*;

/// Player intent, as produced by whatever captures input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Undo,
    Restart,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Moved(MoveReport),
    Undone(UndoReport),
    Restarted(GameState),
}

impl SessionEvent {
    /// Whether this event changed the game
    pub const fn has_update(&self) -> bool {
        match self {
            Self::Moved(report) => report.success(),
            Self::Undone(report) => report.success,
            Self::Restarted(_) => true,
        }
    }
}

/// A [`PlayEngine`] bound to a [`GameStore`]: restores the saved game on open and saves after every change.
///
/// Storage failures are logged and otherwise ignored, play never stops because of them.
#[derive(Debug)]
pub struct Session<S, T> {
    store: S,
    engine: PlayEngine<T>,
    statistics: Statistics,
}

impl<S: GameStore, T: TileSpawner> Session<S, T> {
    pub fn open(store: S, spawner: T) -> Self {
        let settings = store.load_settings().unwrap_or_else(|err| {
            log::warn!("Could not load settings, using defaults: {}", err);
            Settings::default()
        });
        let best_score = store.load_best_score().unwrap_or_else(|err| {
            log::warn!("Could not load best score: {}", err);
            0
        });
        let statistics = store.load_statistics().unwrap_or_else(|err| {
            log::warn!("Could not load statistics: {}", err);
            Statistics::default()
        });
        let config = settings.game_config();
        let saved = match store.load_state() {
            Ok(Some(state)) => match state.validate(&config) {
                Ok(()) => Some(state),
                Err(err) => {
                    log::warn!("Discarding saved game: {}", err);
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log::warn!("Discarding saved game: {}", err);
                None
            }
        };

        let resumed = saved.is_some();
        let mut engine = match saved {
            Some(state) => {
                log::info!("Resumed saved game");
                PlayEngine::resume_unchecked(config, spawner, state)
            }
            None => PlayEngine::new(config, spawner),
        };
        engine.raise_best_score(best_score);

        let mut session = Self {
            store,
            engine,
            statistics,
        };
        if !resumed {
            session.statistics.record_game_started();
            session.save();
        }
        session
    }

    pub fn engine(&self) -> &PlayEngine<T> {
        &self.engine
    }

    pub fn state(&self) -> GameState {
        self.engine.state()
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn apply(&mut self, command: Command) -> SessionEvent {
        let event = match command {
            Command::Move(direction) => {
                let report = self.engine.move_tiles(direction);
                self.statistics.record_move(&report);
                SessionEvent::Moved(report)
            }
            Command::Undo => {
                let report = self.engine.undo();
                if report.success {
                    self.statistics.record_undo();
                }
                SessionEvent::Undone(report)
            }
            Command::Restart => {
                let state = self.engine.new_game();
                self.statistics.record_game_started();
                SessionEvent::Restarted(state)
            }
        };

        if event.has_update() {
            self.save();
        }
        event
    }

    /// Wipes all stored data. The current game and best score stay in memory until the next save.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear()?;
        self.statistics = Statistics::default();
        Ok(())
    }

    fn save(&mut self) {
        let state = self.engine.state();
        if let Err(err) = self.store.save_state(&state) {
            log::error!("Could not save game: {}", err);
        }
        if let Err(err) = self.store.save_best_score(state.best_score) {
            log::error!("Could not save best score: {}", err);
        }
        if let Err(err) = self.store.save_statistics(&self.statistics) {
            log::error!("Could not save statistics: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_state(rows: &[[u32; 4]], best_score: Score) -> JsonStore<MemoryBackend> {
        let mut store = JsonStore::new(MemoryBackend::new());
        let state = GameState {
            grid: Grid::from_rows(rows).unwrap(),
            score: 20,
            best_score,
            phase: Phase::Playing,
            undo_count: 0,
            reached_win: false,
        };
        store.save_state(&state).unwrap();
        store
    }

    /// Backend that accepts nothing.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Err(GameError::Storage("unavailable".into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(GameError::Storage("unavailable".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(GameError::Storage("unavailable".into()))
        }
    }

    #[test]
    fn fresh_store_starts_and_saves_a_new_game() {
        let spawner = ScriptedSpawner::new([((0, 0), Tile::TWO), ((1, 1), Tile::TWO)]);
        let session = Session::open(JsonStore::new(MemoryBackend::new()), spawner);

        let saved = session.store().load_state().unwrap().unwrap();
        assert_eq!(saved, session.state());
        assert_eq!(saved.grid[(0, 0)], Tile::TWO);
        assert_eq!(session.statistics().games_played, 1);
    }

    #[test]
    fn end_to_end_move_left() {
        let store = store_with_state(&[[2, 2, 0, 0], [0, 2, 0, 0], [0; 4], [0; 4]], 100);
        let spawner = ScriptedSpawner::new([((2, 2), Tile::FOUR)]);
        let mut session = Session::open(store, spawner);

        let event = session.apply(Command::Move(Direction::Left));

        let SessionEvent::Moved(report) = event else {
            panic!("expected a move");
        };
        assert_eq!(report.state.grid.to_rows()[0], vec![4, 0, 0, 0]);
        assert_eq!(report.score_delta, 4);
        assert!(report.merged.contains(&(0, 0)));
        assert_eq!(report.spawned, Some(((2, 2), Tile::FOUR)));
        assert_eq!(report.state.score, 24);
        assert_eq!(report.state.best_score, 100);

        let saved = session.store().load_state().unwrap().unwrap();
        assert_eq!(saved, report.state);
        assert_eq!(session.statistics().moves_made, 1);
    }

    #[test]
    fn corrupt_state_falls_back_to_new_game() {
        let mut backend = MemoryBackend::new();
        backend
            .write("2048-game-gameState", r#"{"grid":[[2,0],[0,0]],"score":8,"bestScore":8,"phase":"playing","undoCount":0}"#)
            .unwrap();
        backend.write("2048-game-bestScore", "64").unwrap();

        let session = Session::open(JsonStore::new(backend), RandomSpawner::from_seed(5));
        let state = session.state();

        assert_eq!(state.grid.size(), 4);
        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 64);
        assert_eq!(state.grid.empty_cells().len(), 14);
    }

    #[test]
    fn settings_drive_grid_size_and_penalty() {
        let mut store = JsonStore::new(MemoryBackend::new());
        store
            .save_settings(&Settings {
                grid_size: 5,
                undo_penalty_base: 3.0,
                undo_penalty_multiplier: 2.0,
                ..Settings::default()
            })
            .unwrap();
        let mut session = Session::open(store, RandomSpawner::from_seed(9));
        assert_eq!(session.state().grid.size(), 5);

        let moved = Direction::ALL
            .into_iter()
            .any(|direction| session.apply(Command::Move(direction)).has_update());
        assert!(moved);

        let SessionEvent::Undone(report) = session.apply(Command::Undo) else {
            panic!("expected an undo");
        };
        assert_eq!(report.penalty, 3);
        assert_eq!(session.statistics().undo_count, 1);
    }

    #[test]
    fn failed_undo_is_not_saved_or_counted() {
        let store = store_with_state(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        let mut session = Session::open(store, ScriptedSpawner::default());

        let event = session.apply(Command::Undo);

        assert!(!event.has_update());
        assert_eq!(session.statistics().undo_count, 0);
    }

    #[test]
    fn restart_keeps_best_score_and_counts_games() {
        let store = store_with_state(&[[4, 4, 0, 0], [0; 4], [0; 4], [0; 4]], 0);
        let mut session = Session::open(store, ScriptedSpawner::default());
        session.apply(Command::Move(Direction::Left));

        let SessionEvent::Restarted(state) = session.apply(Command::Restart) else {
            panic!("expected a restart");
        };

        assert_eq!(state.score, 0);
        assert_eq!(state.best_score, 28);
        assert_eq!(session.store().load_best_score().unwrap(), 28);
        assert_eq!(session.statistics().games_played, 1);
    }

    #[test]
    fn storage_failures_do_not_stop_play() {
        let mut session = Session::open(JsonStore::new(BrokenBackend), RandomSpawner::from_seed(11));

        let moved = Direction::ALL
            .into_iter()
            .any(|direction| session.apply(Command::Move(direction)).has_update());

        assert!(moved);
        assert!(session.clear_all().is_err());
    }
}
