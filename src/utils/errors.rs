use thiserror::Error;

/// Raised while loading or validating the game settings. Always fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to read settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("At least one player is required")]
    NoPlayers,
    #[error("The table needs at least one slot ({rows}x{columns})")]
    EmptyTable { rows: usize, columns: usize },
    #[error("A match needs at least two cards, got {0}")]
    MatchTooSmall(usize),
    #[error("Deck size {deck_size} exceeds the {available} distinct cards")]
    DeckTooLarge { deck_size: usize, available: usize },
    #[error("Player {0} has no key bindings")]
    MissingKeys(usize),
    #[error("Player {player} binds {keys} keys but the table has {slots} slots")]
    KeyCountMismatch {
        player: usize,
        keys: usize,
        slots: usize,
    },
}

/// Raised by the input sources when a key press cannot be routed to a player.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Key `{0}` is not bound to any player")]
    UnboundKey(char),
    #[error("Player {0} does not exist")]
    UnknownPlayer(usize),
}
