use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use super::presenter::Presenter;
use super::rules::MatchRules;
use super::shutdown::Shutdown;
use super::table::Table;
use crate::models::claim::Claim;
use crate::models::settings::Settings;

/// State shared by the dealer and every player worker.
pub struct GameState {
    pub id: Uuid,
    pub settings: Arc<Settings>,
    /// The single table lock. Only the dealer places or removes cards,
    /// players take it to read the board and update their own selection.
    pub table: Mutex<Table>,
    pub rules: Arc<dyn MatchRules>,
    pub presenter: Arc<dyn Presenter>,
    /// Raised from outside the game (ctrl-c, tests).
    pub terminate: Shutdown,
    claims: mpsc::UnboundedSender<Claim>,
    dealing: AtomicBool,
    game_over: AtomicBool,
}

impl GameState {
    pub fn new(
        settings: Arc<Settings>,
        rules: Arc<dyn MatchRules>,
        presenter: Arc<dyn Presenter>,
        claims: mpsc::UnboundedSender<Claim>,
    ) -> Self {
        let table = Table::new(
            settings.table_size(),
            settings.deck_size(),
            settings.players(),
            Arc::clone(&presenter),
        );

        Self {
            id: Uuid::new_v4(),
            settings,
            table: Mutex::new(table),
            rules,
            presenter,
            terminate: Shutdown::new(),
            claims,
            dealing: AtomicBool::new(true),
            game_over: AtomicBool::new(false),
        }
    }

    /// Queues a claim for the dealer. Wakes the dealer if it is waiting.
    pub fn submit_claim(&self, claim: Claim) {
        // The receiver only goes away with the dealer, after every player has stopped.
        let _ = self.claims.send(claim);
    }

    pub fn match_size(&self) -> usize {
        self.settings.feature_size
    }

    /// True while the dealer is sweeping or refilling the table between rounds.
    pub fn is_dealing(&self) -> bool {
        self.dealing.load(Ordering::SeqCst)
    }

    pub fn set_dealing(&self, dealing: bool) {
        self.dealing.store(dealing, Ordering::SeqCst);
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.load(Ordering::SeqCst)
    }

    pub fn set_game_over(&self) {
        self.game_over.store(true, Ordering::SeqCst);
    }

    /// The game is winding down, either naturally or because it was terminated.
    pub fn is_terminating(&self) -> bool {
        self.is_game_over() || self.terminate.is_triggered()
    }
}
