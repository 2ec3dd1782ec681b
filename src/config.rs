//! Runtime tunables. Everything has a default matching the stock game; the
//! `serde_json` feature allows the host page to pass overrides as JSON.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::score::DEFAULT_KEY_PREFIX;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Difficulty the first session starts with.
    pub difficulty: Difficulty,
    /// Wrong guesses needed before the hint button is offered.
    pub hint_threshold: u32,
    /// Storage key prefix; the difficulty name is appended.
    pub key_prefix: String,
    /// Drop the shown hint on the next valid guess.
    pub clear_hint_on_guess: bool,
    /// `log` level name ("error" .. "trace").
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            hint_threshold: 3,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            clear_hint_on_guess: false,
            log_level: if cfg!(debug_assertions) { "debug" } else { "info" }.to_string(),
        }
    }
}

#[cfg(feature = "serde_json")]
#[derive(Debug, thiserror::Error)]
#[error("invalid game config: {0}")]
pub struct ConfigError(#[from] serde_json::Error);

impl GameConfig {
    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level
            .parse()
            .unwrap_or(log::LevelFilter::Info)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_game() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.difficulty, Difficulty::Medium);
        assert_eq!(cfg.hint_threshold, 3);
        assert_eq!(cfg.key_prefix, "numguess_highscore_");
        assert!(!cfg.clear_hint_on_guess);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let cfg = GameConfig {
            log_level: "loud".into(),
            ..GameConfig::default()
        };
        assert_eq!(cfg.log_level(), log::LevelFilter::Info);
        let cfg = GameConfig {
            log_level: "warn".into(),
            ..GameConfig::default()
        };
        assert_eq!(cfg.log_level(), log::LevelFilter::Warn);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"difficulty":"Hard","clear_hint_on_guess":true}"#)
            .unwrap();
        assert_eq!(cfg.difficulty, Difficulty::Hard);
        assert!(cfg.clear_hint_on_guess);
        assert_eq!(cfg.hint_threshold, 3);
        assert!(GameConfig::from_json("{nope").is_err());
    }
}
