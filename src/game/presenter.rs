use crate::game::entity::card::CardId;
use crate::logger;
use crate::models::ui_event::UiEvent;

/// One-way notifications from the dealer and the players to whatever draws
/// the table.
///
/// Only `publish` is required; the named calls wrap their arguments in a
/// [`UiEvent`]. Calls may happen while the table lock is held, so
/// implementations must not block.
pub trait Presenter: Send + Sync {
    fn publish(&self, event: UiEvent);

    fn place_card(&self, slot: usize, card: CardId) {
        self.publish(UiEvent::PlaceCard { slot, card });
    }

    fn remove_card(&self, slot: usize) {
        self.publish(UiEvent::RemoveCard { slot });
    }

    fn place_token(&self, player: usize, slot: usize) {
        self.publish(UiEvent::PlaceToken { player, slot });
    }

    fn remove_token(&self, player: usize, slot: usize) {
        self.publish(UiEvent::RemoveToken { player, slot });
    }

    fn set_score(&self, player: usize, score: u32) {
        self.publish(UiEvent::SetScore { player, score });
    }

    fn set_freeze(&self, player: usize, millis: u64) {
        self.publish(UiEvent::SetFreeze { player, millis });
    }

    fn set_countdown(&self, millis: i64, warning: bool) {
        self.publish(UiEvent::SetCountdown { millis, warning });
    }

    fn set_elapsed(&self, millis: i64) {
        self.publish(UiEvent::SetElapsed { millis });
    }

    fn announce_winners(&self, players: Vec<usize>) {
        self.publish(UiEvent::AnnounceWinners { players });
    }

    fn dispose(&self) {
        self.publish(UiEvent::Dispose);
    }
}

/// Writes every event as a JSON line through the logger.
///
/// Countdown ticks are frequent, so they only show up in debug builds.
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn publish(&self, event: UiEvent) {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(error) => {
                logger!(ERROR, "[UI] Unable to serialize {event:?}: {error}");
                return;
            }
        };

        match event {
            UiEvent::SetCountdown { .. } | UiEvent::SetElapsed { .. } | UiEvent::SetFreeze { .. } => {
                logger!(DEBUG, "[UI] {json}")
            }
            _ => logger!(INFO, "[UI] {json}"),
        }
    }
}
