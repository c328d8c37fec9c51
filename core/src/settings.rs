use serde::{Deserialize, Serialize};

use crate::*;

/// User-tunable settings, as persisted by a [`GameStore`].
///
/// Every field falls back to its default when missing, so older or partial documents still load.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub grid_size: Coord,
    pub win_tile: u32,
    pub undo_penalty_base: f64,
    pub undo_penalty_multiplier: f64,
}

impl Settings {
    pub const DEFAULT_GRID_SIZE: Coord = 4;
    pub const DEFAULT_WIN_TILE: u32 = 2048;

    /// Engine configuration for these settings, with out-of-range values replaced.
    pub fn game_config(&self) -> GameConfig {
        let config = GameConfig::new(self.grid_size, self.win_tile).with_undo_penalty(
            UndoPenalty::new(self.undo_penalty_base, self.undo_penalty_multiplier),
        );
        if config.size != self.grid_size || config.win_tile.value() != self.win_tile {
            log::warn!(
                "Adjusted settings to grid size {} and win tile {}",
                config.size,
                config.win_tile
            );
        }
        config
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            win_tile: Self::DEFAULT_WIN_TILE,
            undo_penalty_base: UndoPenalty::DEFAULT_BASE,
            undo_penalty_multiplier: UndoPenalty::DEFAULT_MULTIPLIER,
        }
    }
}

/// Geometric undo penalty, `floor(base * multiplier ^ undo_count)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UndoPenalty {
    base: f64,
    multiplier: f64,
}

impl UndoPenalty {
    pub const DEFAULT_BASE: f64 = 10.0;
    pub const DEFAULT_MULTIPLIER: f64 = 1.33;
    pub const DEFAULT: Self = Self {
        base: Self::DEFAULT_BASE,
        multiplier: Self::DEFAULT_MULTIPLIER,
    };

    /// Parameters that are not finite and positive fall back to the defaults.
    pub fn new(base: f64, multiplier: f64) -> Self {
        let sane = |value: f64, default: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                log::warn!("Ignoring undo penalty parameter {value}, using {default}");
                default
            }
        };
        Self {
            base: sane(base, Self::DEFAULT_BASE),
            multiplier: sane(multiplier, Self::DEFAULT_MULTIPLIER),
        }
    }

    /// Penalty for the undo that follows `undo_count` earlier undos.
    pub fn for_undo(&self, undo_count: u32) -> Score {
        let exponent = i32::try_from(undo_count).unwrap_or(i32::MAX);
        let penalty = (self.base * self.multiplier.powi(exponent)).floor();
        if penalty.is_nan() || penalty <= 0.0 {
            0
        } else if penalty >= f64::from(Score::MAX) {
            Score::MAX
        } else {
            penalty as Score
        }
    }
}

impl Default for UndoPenalty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_grows_geometrically() {
        let penalty = UndoPenalty::default();
        let penalties: Vec<_> = (0..4).map(|n| penalty.for_undo(n)).collect();

        assert_eq!(penalties, vec![10, 13, 17, 23]);
    }

    #[test]
    fn penalty_saturates() {
        assert_eq!(UndoPenalty::new(10.0, 2.0).for_undo(u32::MAX), Score::MAX);
        assert_eq!(UndoPenalty::new(10.0, 0.5).for_undo(40), 0);
    }

    #[test]
    fn bad_penalty_parameters_fall_back_to_defaults() {
        assert_eq!(UndoPenalty::new(f64::NAN, -1.0), UndoPenalty::default());
        assert_eq!(UndoPenalty::new(0.0, 0.0), UndoPenalty::default());
        assert_eq!(UndoPenalty::new(0.0, 1.33).for_undo(0), 10);
    }

    #[test]
    fn zero_penalty_base_in_settings_uses_the_default() {
        let settings: Settings = serde_json::from_str(r#"{"undoPenaltyBase": 0}"#).unwrap();

        assert_eq!(settings.game_config().undo_penalty.for_undo(0), 10);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"undoPenaltyMultiplier": 2.0}"#).unwrap();

        assert_eq!(settings.grid_size, 4);
        assert_eq!(settings.win_tile, 2048);
        assert_eq!(settings.undo_penalty_base, 10.0);
        assert_eq!(settings.undo_penalty_multiplier, 2.0);
    }

    #[test]
    fn game_config_clamps_out_of_range_settings() {
        let settings = Settings {
            grid_size: 1,
            win_tile: 1000,
            ..Settings::default()
        };

        let config = settings.game_config();

        assert_eq!(config.size, GameConfig::MIN_SIZE);
        assert_eq!(config.win_tile.value(), 2048);
    }
}
