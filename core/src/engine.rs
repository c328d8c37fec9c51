use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Playing,
    /// The win tile was reached; play may continue.
    Won,
    /// No empty cell and no mergeable pair. Only undo gets out of here.
    Stuck,
}

impl Phase {
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }

    pub const fn is_stuck(self) -> bool {
        matches!(self, Self::Stuck)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
}

impl PhaseTransition {
    fn between(from: Phase, to: Phase) -> Option<Self> {
        (from != to).then_some(Self { from, to })
    }
}

/// Externally observable snapshot of a game, also the persisted form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: Grid,
    pub score: Score,
    pub best_score: Score,
    pub phase: Phase,
    pub undo_count: u32,
    /// Whether the win tile has been reached this game, so the win is announced only once.
    #[serde(default)]
    pub reached_win: bool,
}

impl GameState {
    /// Checks the state fits a game of `config`.
    pub fn validate(&self, config: &GameConfig) -> Result<()> {
        self.grid
            .validate(config.size)
            .map_err(|err| GameError::CorruptPersistedState(err.to_string()))
    }
}

/// Position before the last move, restored by undo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub grid: Grid,
    pub score: Score,
    pub phase: Phase,
    pub reached_win: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub direction: Direction,
    pub outcome: MoveOutcome,
    pub score_delta: Score,
    /// Cells of the new grid holding merged tiles.
    pub merged: Vec<Coord2>,
    pub spawned: Option<(Coord2, Tile)>,
    pub transition: Option<PhaseTransition>,
    /// Only set when the move was taken as an undo.
    pub penalty: Score,
    pub state: GameState,
}

impl MoveReport {
    pub const fn success(&self) -> bool {
        self.outcome.has_update()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoReport {
    pub success: bool,
    pub penalty: Score,
    pub transition: Option<PhaseTransition>,
    pub state: GameState,
}

/// The 2048 state machine: owns the grid, score and phase, and the single undo snapshot.
#[derive(Clone, Debug)]
pub struct PlayEngine<T> {
    config: GameConfig,
    spawner: T,
    grid: Grid,
    score: Score,
    best_score: Score,
    phase: Phase,
    undo_count: u32,
    reached_win: bool,
    undo: Option<UndoSnapshot>,
}

impl<T: TileSpawner> PlayEngine<T> {
    /// Creates an engine and starts a new game on it.
    pub fn new(config: GameConfig, spawner: T) -> Self {
        let mut engine = Self::blank(config, spawner);
        engine.new_game();
        engine
    }

    /// Creates an engine that continues a saved game.
    pub fn resume(config: GameConfig, spawner: T, state: GameState) -> Result<Self> {
        state.validate(&config)?;
        Ok(Self::resume_unchecked(config, spawner, state))
    }

    pub(crate) fn resume_unchecked(config: GameConfig, spawner: T, state: GameState) -> Self {
        let mut engine = Self::blank(config, spawner);
        engine.restore(state);
        engine
    }

    fn blank(config: GameConfig, spawner: T) -> Self {
        Self {
            config,
            spawner,
            grid: Grid::new(config.size),
            score: 0,
            best_score: 0,
            phase: Phase::default(),
            undo_count: 0,
            reached_win: false,
            undo: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best_score(&self) -> Score {
        self.best_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn undo_count(&self) -> u32 {
        self.undo_count
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Penalty the next undo would cost.
    pub fn next_undo_penalty(&self) -> Score {
        self.config.undo_penalty.for_undo(self.undo_count)
    }

    pub fn can_move(&self) -> bool {
        self.grid.can_move()
    }

    pub fn state(&self) -> GameState {
        GameState {
            grid: self.grid.clone(),
            score: self.score,
            best_score: self.best_score,
            phase: self.phase,
            undo_count: self.undo_count,
            reached_win: self.reached_win,
        }
    }

    /// Raises the best score to at least `score`.
    pub fn raise_best_score(&mut self, score: Score) {
        self.best_score = self.best_score.max(score);
    }

    pub fn new_game(&mut self) -> GameState {
        self.grid = Grid::new(self.config.size);
        self.score = 0;
        self.phase = Phase::Playing;
        self.undo_count = 0;
        self.reached_win = false;
        self.undo = None;

        self.spawn_tile();
        self.spawn_tile();
        log::info!("New {0}x{0} game", self.config.size);
        self.state()
    }

    /// Replaces the current game with a saved one, keeping the higher best score.
    pub fn load(&mut self, state: GameState) -> Result<()> {
        state.validate(&self.config)?;
        self.restore(state);
        Ok(())
    }

    /// Saved games carry no undo snapshot.
    fn restore(&mut self, state: GameState) {
        self.grid = state.grid;
        self.score = state.score;
        self.raise_best_score(state.best_score.max(state.score));
        self.phase = state.phase;
        self.undo_count = state.undo_count;
        self.reached_win = state.reached_win || state.phase.is_won();
        self.undo = None;
        log::debug!("Restored game with score {} in phase {:?}", self.score, self.phase);
    }

    pub fn move_tiles(&mut self, direction: Direction) -> MoveReport {
        if self.phase.is_stuck() {
            // left while stuck doubles as undo
            if direction == Direction::Left && self.undo.is_some() {
                log::debug!("Move left while stuck, undoing instead");
                let undo = self.undo();
                return MoveReport {
                    direction,
                    outcome: MoveOutcome::Undone,
                    score_delta: 0,
                    merged: Vec::new(),
                    spawned: None,
                    transition: undo.transition,
                    penalty: undo.penalty,
                    state: undo.state,
                };
            }
            return self.no_move(direction);
        }

        let slide = self.grid.slide(direction);
        if !slide.moved {
            self.undo = None;
            return self.no_move(direction);
        }

        self.undo = Some(UndoSnapshot {
            grid: self.grid.clone(),
            score: self.score,
            phase: self.phase,
            reached_win: self.reached_win,
        });
        let previous_phase = self.phase;

        self.grid = slide.grid;
        self.score = self.score.saturating_add(slide.score_delta);
        self.raise_best_score(self.score);
        let spawned = self.spawn_tile();

        if !self.reached_win && self.grid.contains(self.config.win_tile) {
            self.reached_win = true;
            self.phase = Phase::Won;
        } else if !self.grid.can_move() {
            self.phase = Phase::Stuck;
        }

        let transition = PhaseTransition::between(previous_phase, self.phase);
        if let Some(PhaseTransition { from, to }) = transition {
            log::info!("Phase {:?} -> {:?} at score {}", from, to, self.score);
        }
        log::debug!(
            "Moved {}: +{} with {} merges",
            direction,
            slide.score_delta,
            slide.merged.len()
        );

        MoveReport {
            direction,
            outcome: MoveOutcome::Moved,
            score_delta: slide.score_delta,
            merged: slide.merged,
            spawned,
            transition,
            penalty: 0,
            state: self.state(),
        }
    }

    /// Reverts the last move, or reports failure when there is nothing to revert.
    pub fn undo(&mut self) -> UndoReport {
        self.try_undo().unwrap_or_else(|_| UndoReport {
            success: false,
            penalty: 0,
            transition: None,
            state: self.state(),
        })
    }

    pub fn try_undo(&mut self) -> Result<UndoReport> {
        let snapshot = self.undo.take().ok_or(GameError::NoUndoAvailable)?;
        let penalty = self.next_undo_penalty();
        let previous_phase = self.phase;

        self.undo_count = self.undo_count.saturating_add(1);
        self.grid = snapshot.grid;
        self.score = snapshot.score.saturating_sub(penalty);
        self.reached_win = snapshot.reached_win;
        self.phase = match snapshot.phase {
            Phase::Stuck => Phase::Playing,
            phase => phase,
        };
        log::debug!("Undo #{} cost {} points", self.undo_count, penalty);

        Ok(UndoReport {
            success: true,
            penalty,
            transition: PhaseTransition::between(previous_phase, self.phase),
            state: self.state(),
        })
    }

    fn no_move(&self, direction: Direction) -> MoveReport {
        MoveReport {
            direction,
            outcome: MoveOutcome::NoMove,
            score_delta: 0,
            merged: Vec::new(),
            spawned: None,
            transition: None,
            penalty: 0,
            state: self.state(),
        }
    }

    fn spawn_tile(&mut self) -> Option<(Coord2, Tile)> {
        let empty = self.grid.empty_cells();
        let (coords, tile) = self.spawner.spawn(&empty)?;
        if !empty.contains(&coords) || !self.grid.place(coords, tile) {
            log::warn!("Spawner picked occupied cell {:?}, ignored", coords);
            return None;
        }
        log::trace!("Spawned {} at {:?}", tile, coords);
        Some((coords, tile))
    }
}
