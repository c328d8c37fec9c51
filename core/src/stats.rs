use serde::{Deserialize, Serialize};

use crate::*;

/// Lifetime counters kept across games.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub games_played: u32,
    pub wins: u32,
    pub moves_made: u64,
    pub undo_count: u32,
    pub highest_tile: u32,
}

impl Statistics {
    pub fn record_game_started(&mut self) {
        self.games_played = self.games_played.saturating_add(1);
    }

    pub fn record_move(&mut self, report: &MoveReport) {
        match report.outcome {
            MoveOutcome::NoMove => {}
            MoveOutcome::Moved => {
                self.moves_made = self.moves_made.saturating_add(1);
                self.highest_tile = self.highest_tile.max(report.state.grid.max_tile().value());
                if report.transition.is_some_and(|t| t.to == Phase::Won) {
                    self.wins = self.wins.saturating_add(1);
                }
            }
            MoveOutcome::Undone => self.record_undo(),
        }
    }

    pub fn record_undo(&mut self) {
        self.undo_count = self.undo_count.saturating_add(1);
    }
}
