use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::utils::errors::ConfigError;

/// Fixed parameters of a game, read once at startup.
///
/// Loaded from an optional TOML file layered under `SET_*` environment
/// variables. Every key has a default so an empty source yields a playable
/// two player game.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub human_players: usize,
    pub computer_players: usize,
    pub player_names: Vec<String>,
    /// One string per player, the i-th character selects slot i.
    pub player_keys: Vec<String>,

    pub rows: usize,
    pub columns: usize,
    /// Cards per match, also the number of values a feature can take.
    pub feature_size: usize,
    pub feature_count: usize,
    pub deck_size: Option<usize>,

    /// Negative disables the countdown, zero counts elapsed time instead.
    pub turn_timeout_millis: i64,
    pub turn_timeout_warning_millis: i64,
    pub point_freeze_millis: u64,
    pub penalty_freeze_millis: u64,
    pub end_game_pause_millis: u64,
    pub computer_delay_millis: u64,

    pub hints: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            human_players: 2,
            computer_players: 0,
            player_names: vec!["Player 1".to_string(), "Player 2".to_string()],
            player_keys: vec!["qwerasdfzxcv".to_string(), "uiopjkl;m,./".to_string()],
            rows: 3,
            columns: 4,
            feature_size: 3,
            feature_count: 4,
            deck_size: None,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            end_game_pause_millis: 5_000,
            computer_delay_millis: 50,
            hints: false,
        }
    }
}

impl Settings {
    /// Reads `path` (if present) and the `SET_*` environment, then validates the result.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("SET")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("player_names")
                    .with_list_parse_key("player_keys"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players() == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.table_size() == 0 {
            return Err(ConfigError::EmptyTable {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.feature_size < 2 {
            return Err(ConfigError::MatchTooSmall(self.feature_size));
        }

        let available = self.feature_size.pow(self.feature_count as u32);
        if self.deck_size() > available {
            return Err(ConfigError::DeckTooLarge {
                deck_size: self.deck_size(),
                available,
            });
        }

        for player in 0..self.players() {
            let keys = self
                .player_keys
                .get(player)
                .ok_or(ConfigError::MissingKeys(player))?;
            let count = keys.chars().count();
            if count != self.table_size() {
                return Err(ConfigError::KeyCountMismatch {
                    player,
                    keys: count,
                    slots: self.table_size(),
                });
            }
        }

        Ok(())
    }

    pub fn players(&self) -> usize {
        self.human_players + self.computer_players
    }

    pub fn table_size(&self) -> usize {
        self.rows * self.columns
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
            .unwrap_or_else(|| self.feature_size.pow(self.feature_count as u32))
    }

    /// Humans take the first ids, computers the rest.
    pub fn is_human(&self, player: usize) -> bool {
        player < self.human_players
    }

    pub fn player_name(&self, player: usize) -> String {
        self.player_names
            .get(player)
            .cloned()
            .unwrap_or_else(|| format!("Player {}", player + 1))
    }

    pub fn keys(&self, player: usize) -> Vec<char> {
        self.player_keys
            .get(player)
            .map(|keys| keys.chars().collect())
            .unwrap_or_default()
    }

    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    pub fn end_game_pause(&self) -> Duration {
        Duration::from_millis(self.end_game_pause_millis)
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_millis)
    }
}
