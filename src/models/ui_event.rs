use serde::Serialize;

use crate::game::entity::card::CardId;

/// A single notification for the presentation surface.
///
/// Slots are table indexes, players are ids starting from 0 and every
/// duration is in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    PlaceCard { slot: usize, card: CardId },
    RemoveCard { slot: usize },
    PlaceToken { player: usize, slot: usize },
    RemoveToken { player: usize, slot: usize },
    SetScore { player: usize, score: u32 },
    SetFreeze { player: usize, millis: u64 },
    SetCountdown { millis: i64, warning: bool },
    SetElapsed { millis: i64 },
    AnnounceWinners { players: Vec<usize> },
    Dispose,
}
