use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time;

use super::player::Player;
use crate::logger;
use crate::models::settings::Settings;
use crate::utils::errors::InputError;

/// Generates random presses for a computer player.
///
/// Presses only while the player's queue has room and the player is not
/// frozen; otherwise it sleeps until the player's worker wakes it.
pub struct Computer {
    player: Arc<Player>,
    keys: usize,
    delay: Duration,
}

impl Computer {
    pub fn new(player: Arc<Player>, keys: usize, delay: Duration) -> Self {
        Self { player, keys, delay }
    }

    pub async fn run(self) {
        logger!(INFO, "[COMPUTER {}] Starting", self.player.id);
        let mut rng = SmallRng::from_os_rng();

        while !self.player.is_terminated() {
            if self.player.is_queue_full() || self.player.is_frozen() {
                tokio::select! {
                    _ = self.player.input_ready() => {}
                    _ = self.player.terminated() => break,
                }
                continue;
            }

            let slot = rng.random_range(0..self.keys);
            self.player.key_pressed(slot).await;

            if self.delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    _ = time::sleep(self.delay) => {}
                    _ = self.player.terminated() => break,
                }
            }
        }

        logger!(INFO, "[COMPUTER {}] Terminated", self.player.id);
    }
}

/// Routes typed keys to the human players that bound them.
pub struct Keyboard {
    bindings: HashMap<char, (usize, usize)>,
    players: Vec<Arc<Player>>,
}

impl Keyboard {
    pub fn new(settings: &Settings, players: Vec<Arc<Player>>) -> Self {
        let mut bindings = HashMap::new();
        for player in players.iter().filter(|p| p.is_human()) {
            for (slot, key) in settings.keys(player.id).into_iter().enumerate() {
                if let Some((other, _)) = bindings.insert(key, (player.id, slot)) {
                    logger!(WARN, "[KEYBOARD] Key `{key}` moved from player {other} to player {}", player.id);
                }
            }
        }
        Self { bindings, players }
    }

    /// The player and slot bound to `key`.
    pub fn route(&self, key: char) -> Result<(usize, usize), InputError> {
        self.bindings
            .get(&key)
            .copied()
            .ok_or(InputError::UnboundKey(key))
    }

    /// Forwards `key` to its player. `Ok(false)` means the player refused the press.
    pub async fn press(&self, key: char) -> Result<bool, InputError> {
        let (player, slot) = self.route(key)?;
        let player = self
            .players
            .get(player)
            .ok_or(InputError::UnknownPlayer(player))?;
        Ok(player.key_pressed(slot).await)
    }

    /// Reads stdin line by line, treating every character as a key press.
    /// Returns when stdin closes.
    pub async fn run(self) {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(error) => {
                    logger!(ERROR, "[KEYBOARD] Unable to read input: {error}");
                    break;
                }
            };

            for key in line.chars().filter(|c| !c.is_whitespace()) {
                if let Err(error) = self.press(key).await {
                    logger!(DEBUG, "[KEYBOARD] {error}");
                }
            }
        }
        logger!(DEBUG, "[KEYBOARD] Input closed");
    }
}
