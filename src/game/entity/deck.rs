use std::collections::VecDeque;

use rand::seq::SliceRandom;

use super::card::CardId;

/// Draw pile of the cards that are not on the table.
#[derive(Debug, Default)]
pub struct Deck {
    cards: VecDeque<CardId>,
}

impl Deck {
    /// A deck holding every card id in `0..size`, in order.
    pub fn full(size: usize) -> Self {
        Self {
            cards: (0..size).collect(),
        }
    }

    pub fn shuffle(&mut self) {
        self.cards.make_contiguous().shuffle(&mut rand::rng());
    }

    /// Removes the card at the front of the pile.
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    pub fn put_back(&mut self, card: CardId) {
        self.cards.push_back(card);
    }

    /// The pile from front to back.
    pub fn cards(&self) -> Vec<CardId> {
        self.cards.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl From<Vec<CardId>> for Deck {
    fn from(cards: Vec<CardId>) -> Self {
        Self {
            cards: cards.into(),
        }
    }
}
