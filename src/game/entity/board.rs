use super::card::CardId;

/// Slot to card mapping of the table, with its inverse.
///
/// Not synchronized on its own: the dealer keeps it inside the table lock.
#[derive(Debug)]
pub struct Board {
    slot_to_card: Vec<Option<CardId>>,
    card_to_slot: Vec<Option<usize>>,
}

impl Board {
    pub fn new(slots: usize, deck_size: usize) -> Self {
        Self {
            slot_to_card: vec![None; slots],
            card_to_slot: vec![None; deck_size],
        }
    }

    /// Puts `card` on an empty `slot`. Returns false if the slot is taken
    /// or the card is already on the board.
    pub fn place(&mut self, card: CardId, slot: usize) -> bool {
        if self.slot_to_card[slot].is_some() || self.card_to_slot[card].is_some() {
            return false;
        }
        self.slot_to_card[slot] = Some(card);
        self.card_to_slot[card] = Some(slot);
        true
    }

    /// Clears `slot`, returning the card that was on it.
    pub fn remove(&mut self, slot: usize) -> Option<CardId> {
        let card = self.slot_to_card.get_mut(slot)?.take()?;
        self.card_to_slot[card] = None;
        Some(card)
    }

    pub fn card(&self, slot: usize) -> Option<CardId> {
        self.slot_to_card.get(slot).copied().flatten()
    }

    pub fn slot(&self, card: CardId) -> Option<usize> {
        self.card_to_slot.get(card).copied().flatten()
    }

    pub fn slots(&self) -> usize {
        self.slot_to_card.len()
    }

    pub fn count(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }

    pub fn is_full(&self) -> bool {
        self.count() == self.slots()
    }

    /// Cards on the board in slot order.
    pub fn cards(&self) -> Vec<CardId> {
        self.slot_to_card.iter().flatten().copied().collect()
    }

    /// True when both mappings describe the same placement.
    pub fn is_consistent(&self) -> bool {
        let forward = self
            .slot_to_card
            .iter()
            .enumerate()
            .filter_map(|(slot, card)| card.map(|card| (slot, card)))
            .all(|(slot, card)| self.card_to_slot[card] == Some(slot));
        let backward = self
            .card_to_slot
            .iter()
            .enumerate()
            .filter_map(|(card, slot)| slot.map(|slot| (slot, card)))
            .all(|(slot, card)| self.slot_to_card[slot] == Some(card));
        forward && backward
    }
}
