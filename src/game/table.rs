use std::sync::Arc;

use super::entity::board::Board;
use super::entity::card::CardId;
use super::presenter::Presenter;

/// What a key press did to a player's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Selected,
    Deselected,
    Ignored,
}

/// The board together with every player's selected cards.
///
/// Lives behind the dealer's single table lock. Keeping the selections here
/// means a card removal and a player's read-then-select can never
/// interleave, and a selection can only refer to cards on the board.
pub struct Table {
    board: Board,
    selections: Vec<Vec<CardId>>,
    presenter: Arc<dyn Presenter>,
}

impl Table {
    pub fn new(slots: usize, deck_size: usize, players: usize, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            board: Board::new(slots, deck_size),
            selections: vec![Vec::new(); players],
            presenter,
        }
    }

    pub fn place_card(&mut self, card: CardId, slot: usize) -> bool {
        let placed = self.board.place(card, slot);
        if placed {
            self.presenter.place_card(slot, card);
        }
        placed
    }

    /// Clears `slot` and unlinks its card from every selection holding it.
    pub fn remove_card(&mut self, slot: usize) -> Option<CardId> {
        let card = self.board.remove(slot)?;
        for (player, selection) in self.selections.iter_mut().enumerate() {
            if let Some(index) = selection.iter().position(|&c| c == card) {
                selection.remove(index);
                self.presenter.remove_token(player, slot);
            }
        }
        self.presenter.remove_card(slot);
        Some(card)
    }

    /// Selects the card on `slot` for `player`, or deselects it if already
    /// selected. A new card is only taken while the selection holds fewer
    /// than `limit` cards.
    pub fn toggle(&mut self, player: usize, slot: usize, limit: usize) -> Toggle {
        let Some(card) = self.board.card(slot) else {
            return Toggle::Ignored;
        };
        let Some(selection) = self.selections.get_mut(player) else {
            return Toggle::Ignored;
        };

        if let Some(index) = selection.iter().position(|&c| c == card) {
            selection.remove(index);
            self.presenter.remove_token(player, slot);
            Toggle::Deselected
        } else if selection.len() < limit {
            selection.push(card);
            self.presenter.place_token(player, slot);
            Toggle::Selected
        } else {
            Toggle::Ignored
        }
    }

    pub fn clear_selection(&mut self, player: usize) {
        let Some(selection) = self.selections.get_mut(player) else {
            return;
        };
        for card in selection.drain(..) {
            if let Some(slot) = self.board.slot(card) {
                self.presenter.remove_token(player, slot);
            }
        }
    }

    pub fn selection(&self, player: usize) -> &[CardId] {
        self.selections.get(player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, player: usize, card: CardId) -> bool {
        self.selection(player).contains(&card)
    }

    pub fn card(&self, slot: usize) -> Option<CardId> {
        self.board.card(slot)
    }

    pub fn slot(&self, card: CardId) -> Option<usize> {
        self.board.slot(card)
    }

    pub fn cards(&self) -> Vec<CardId> {
        self.board.cards()
    }

    pub fn slots(&self) -> usize {
        self.board.slots()
    }

    pub fn count(&self) -> usize {
        self.board.count()
    }

    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    pub fn is_consistent(&self) -> bool {
        self.board.is_consistent()
            && self
                .selections
                .iter()
                .flatten()
                .all(|&card| self.board.slot(card).is_some())
    }
}
