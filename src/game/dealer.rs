use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time;

use super::countdown::Countdown;
use super::entity::deck::Deck;
use super::game_state::GameState;
use super::player::Player;
use super::presenter::Presenter;
use super::rules::MatchRules;
use super::table::Table;
use crate::logger;
use crate::models::claim::Claim;
use crate::models::exit_code::{ExitCode, ExitStatus};
use crate::models::settings::Settings;
use crate::models::verdict::Verdict;

/// The game coordinator.
///
/// Owns the deck, the claim queue and the countdown, and is the only writer
/// of the board. Claims are judged one at a time in the order they were
/// submitted.
pub struct Dealer {
    state: Arc<GameState>,
    players: Vec<Arc<Player>>,
    deck: Deck,
    countdown: Arc<Countdown>,
    claims: mpsc::UnboundedReceiver<Claim>,
}

/// Lets code outside the game stop it.
#[derive(Clone)]
pub struct DealerHandle {
    state: Arc<GameState>,
}

impl DealerHandle {
    /// Interrupts every wait of the dealer. The dealer then shuts the
    /// workers down and returns from [`Dealer::run`].
    pub fn terminate(&self) {
        logger!(INFO, "[DEALER {}] Termination requested", self.state.id);
        self.state.terminate.trigger();
    }
}

impl Dealer {
    pub fn new(
        settings: Arc<Settings>,
        rules: Arc<dyn MatchRules>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let (claims_tx, claims) = mpsc::unbounded_channel();
        let countdown = Arc::new(Countdown::new(
            settings.turn_timeout_millis,
            settings.turn_timeout_warning_millis,
            Arc::clone(&presenter),
        ));
        let deck = Deck::full(settings.deck_size());
        let state = Arc::new(GameState::new(settings, rules, presenter, claims_tx));
        let players = (0..state.settings.players())
            .map(|id| Arc::new(Player::new(id, Arc::clone(&state))))
            .collect();

        Self {
            state,
            players,
            deck,
            countdown,
            claims,
        }
    }

    pub fn handle(&self) -> DealerHandle {
        DealerHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn players(&self) -> Vec<Arc<Player>> {
        self.players.clone()
    }

    /// Plays the game to the end and tears every worker down.
    pub async fn run(mut self) -> ExitStatus {
        let id = self.state.id;
        logger!(INFO, "[DEALER {id}] Starting with {} players", self.players.len());

        let mut workers = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let (ready_tx, ready_rx) = oneshot::channel();
            workers.push(tokio::spawn(Arc::clone(player).run(ready_tx)));
            let _ = ready_rx.await;
        }

        let timer = self
            .countdown
            .is_enabled()
            .then(|| tokio::spawn(Arc::clone(&self.countdown).run()));

        let mut round = 0;
        while !self.should_finish().await {
            round += 1;
            logger!(INFO, "[DEALER {id}] Round {round}");

            self.deck.shuffle();
            self.place_cards().await;
            self.countdown.reset();
            self.state.set_dealing(false);

            self.timer_loop().await;

            self.state.set_dealing(true);
            self.remove_all_cards().await;
            tokio::task::yield_now().await;
        }

        self.announce_winners();
        self.shutdown(timer, workers).await;

        let status = if self.state.terminate.is_triggered() {
            ExitStatus::new(ExitCode::Interrupted, "Game terminated")
        } else {
            tokio::select! {
                _ = time::sleep(self.state.settings.end_game_pause()) => {}
                _ = self.state.terminate.triggered() => {}
            }
            ExitStatus::new(ExitCode::GameOver, "No matches left")
        };
        self.state.presenter.dispose();

        logger!(INFO, "[DEALER {id}] Terminated: {}", status.reason);
        status
    }

    /// Countdown first, then the players in reverse start order, each joined
    /// before the next is stopped.
    async fn shutdown(&self, timer: Option<JoinHandle<()>>, workers: Vec<JoinHandle<()>>) {
        if let Some(timer) = timer {
            self.countdown.terminate();
            let _ = timer.await;
        }
        for (player, worker) in self.players.iter().zip(workers).rev() {
            player.terminate();
            let _ = worker.await;
        }
    }

    /// Runs one round until the countdown expires, the board runs out of
    /// matches in untimed mode, or the game ends.
    async fn timer_loop(&mut self) {
        while !self.state.is_terminating() && self.round_active().await {
            self.sleep_until_woken_or_timeout().await;
        }
    }

    async fn round_active(&self) -> bool {
        if self.countdown.counts_down() {
            return !self.countdown.is_expired();
        }
        !self.no_matches_on_table().await
    }

    /// Waits for a claim, the countdown, or termination, whichever comes
    /// first, then drains the claim queue.
    async fn sleep_until_woken_or_timeout(&mut self) {
        let claim = if self.countdown.counts_down() {
            let remaining = Duration::from_millis(self.countdown.remaining().max(0) as u64);
            tokio::select! {
                claim = self.claims.recv() => claim,
                _ = self.countdown.expired() => None,
                _ = time::sleep(remaining) => None,
                _ = self.state.terminate.triggered() => None,
            }
        } else {
            tokio::select! {
                claim = self.claims.recv() => claim,
                _ = self.state.terminate.triggered() => None,
            }
        };

        if let Some(claim) = claim {
            self.check_claims(claim).await;
        }
    }

    /// Judges `first` and then everything queued behind it, oldest first.
    /// Stops as soon as the game is ending; claims left queued get no verdict.
    async fn check_claims(&mut self, first: Claim) {
        let mut next = Some(first);
        while let Some(claim) = next {
            if self.state.is_terminating() {
                break;
            }
            self.check_claim(claim).await;
            next = self.claims.try_recv().ok();
        }
    }

    async fn check_claim(&mut self, claim: Claim) {
        let Some(player) = self.players.get(claim.player).cloned() else {
            logger!(WARN, "[DEALER {}] Claim from unknown player {}", self.state.id, claim.player);
            return;
        };

        let state = Arc::clone(&self.state);
        let mut table = state.table.lock().await;
        let cards = table.selection(player.id).to_vec();
        // A frozen player is still serving its last verdict.
        if claim.ticket != player.ticket()
            || cards.len() != state.match_size()
            || player.is_frozen()
        {
            drop(table);
            logger!(DEBUG, "[DEALER {}] Skipping stale claim from player {}", state.id, player.id);
            player.wake();
            return;
        }

        player.freeze();
        if state.rules.is_valid_match(&cards) {
            player.set_verdict(Verdict::Accepted).await;
            let slots: Vec<usize> = cards.iter().filter_map(|&card| table.slot(card)).collect();
            for slot in slots {
                table.remove_card(slot);
            }
            refill(&mut self.deck, &mut table);
            self.countdown.reset();
            self.hint(&table);

            if self.is_over(&table) {
                logger!(INFO, "[DEALER {}] No matches left in play", state.id);
                state.set_game_over();
            }
            logger!(INFO, "[DEALER {}] `{}` found a match {:?}", state.id, player.name, cards);
        } else {
            player.set_verdict(Verdict::Rejected).await;
            logger!(INFO, "[DEALER {}] `{}` claimed a non-match {:?}", state.id, player.name, cards);
        }
        drop(table);

        // Removed cards may have left other players' claims stale.
        for other in &self.players {
            other.wake();
        }
    }

    async fn place_cards(&mut self) {
        let state = Arc::clone(&self.state);
        let mut table = state.table.lock().await;
        refill(&mut self.deck, &mut table);
        self.hint(&table);
    }

    /// Sends every card on the table back to the deck, clearing all selections.
    async fn remove_all_cards(&mut self) {
        let state = Arc::clone(&self.state);
        let mut table = state.table.lock().await;
        for slot in 0..table.slots() {
            if let Some(card) = table.remove_card(slot) {
                self.deck.put_back(card);
            }
        }
        drop(table);

        for player in &self.players {
            player.wake();
        }
    }

    async fn should_finish(&self) -> bool {
        if self.state.is_terminating() {
            return true;
        }
        let table = self.state.table.lock().await;
        self.is_over(&table)
    }

    /// No match left among the deck and the table together.
    fn is_over(&self, table: &Table) -> bool {
        let mut cards = self.deck.cards();
        cards.extend(table.cards());
        !self.state.rules.has_match(&cards)
    }

    /// No match among the cards on the table. Ends a round when there is no
    /// countdown to do it.
    async fn no_matches_on_table(&self) -> bool {
        let table = self.state.table.lock().await;
        !self.state.rules.has_match(&table.cards())
    }

    fn announce_winners(&self) {
        let best = self.players.iter().map(|p| p.score()).max().unwrap_or(0);
        let winners: Vec<usize> = self
            .players
            .iter()
            .filter(|p| p.score() == best)
            .map(|p| p.id)
            .collect();

        let names: Vec<&str> = winners
            .iter()
            .filter_map(|&id| self.players.get(id))
            .map(|p| p.name.as_str())
            .collect();
        logger!(INFO, "[DEALER {}] Winners with {best} points: {}", self.state.id, names.join(", "));
        self.state.presenter.announce_winners(winners);
    }

    fn hint(&self, table: &Table) {
        if !self.state.settings.hints {
            return;
        }
        for cards in self.state.rules.find_matches(&table.cards(), usize::MAX) {
            let slots: Vec<usize> = cards.iter().filter_map(|&card| table.slot(card)).collect();
            logger!(INFO, "[HINT] Match on slots {slots:?}: cards {cards:?}");
        }
    }
}

/// Fills empty slots in index order from the front of the deck until the
/// deck runs out or the table is full.
fn refill(deck: &mut Deck, table: &mut Table) {
    for slot in 0..table.slots() {
        if deck.is_empty() {
            break;
        }
        if table.card(slot).is_none() {
            if let Some(card) = deck.draw() {
                table.place_card(card, slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::presenter::recorder::Recorder;
    use crate::game::rules::FeatureRules;
    use crate::models::ui_event::UiEvent;

    fn settings() -> Settings {
        Settings {
            human_players: 2,
            computer_players: 0,
            rows: 1,
            columns: 3,
            player_keys: vec!["abc".to_string(), "def".to_string()],
            turn_timeout_millis: 10_000,
            turn_timeout_warning_millis: 0,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            end_game_pause_millis: 0,
            ..Settings::default()
        }
    }

    fn new_dealer(settings: Settings, deck: Vec<usize>) -> (Dealer, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let mut dealer = Dealer::new(
            Arc::new(settings),
            Arc::new(FeatureRules::new(3, 4)),
            Arc::clone(&recorder) as Arc<dyn Presenter>,
        );
        dealer.deck = Deck::from(deck);
        (dealer, recorder)
    }

    fn spawn_players(dealer: &Dealer) -> Vec<JoinHandle<()>> {
        dealer
            .players
            .iter()
            .map(|player| {
                let (ready_tx, _ready_rx) = oneshot::channel();
                tokio::spawn(Arc::clone(player).run(ready_tx))
            })
            .collect()
    }

    async fn select_all(player: &Player, slots: &[usize]) {
        for &slot in slots {
            assert!(player.key_pressed(slot).await, "press on slot {slot} refused");
            tokio::task::yield_now().await;
        }
    }

    async fn next_claim(dealer: &mut Dealer) -> Claim {
        time::timeout(Duration::from_secs(1), dealer.claims.recv())
            .await
            .expect("a claim should be queued")
            .expect("claim queue open")
    }

    async fn card_total(dealer: &Dealer) -> usize {
        dealer.deck.len() + dealer.state.table.lock().await.count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_fills_empty_slots_in_order() {
        let (mut dealer, recorder) = new_dealer(settings(), vec![0, 1, 2, 3]);
        dealer.place_cards().await;

        let table = dealer.state.table.lock().await;
        assert_eq!(table.cards(), vec![0, 1, 2]);
        assert!(table.is_full());
        assert!(table.is_consistent());
        drop(table);
        assert_eq!(dealer.deck.cards(), vec![3]);
        assert_eq!(recorder.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refill_stops_when_deck_runs_out() {
        let (mut dealer, _recorder) = new_dealer(settings(), vec![4]);
        dealer.place_cards().await;
        assert_eq!(dealer.state.table.lock().await.cards(), vec![4]);
        assert!(dealer.deck.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_claim_scores_and_refills() {
        let (mut dealer, recorder) = new_dealer(settings(), vec![0, 1, 2, 9, 10, 11]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        dealer.countdown.reset();
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 1, 2]).await;
        let claim = next_claim(&mut dealer).await;
        dealer.check_claims(claim).await;

        assert_eq!(player.verdict().await, Verdict::Accepted);
        assert_eq!(player.score(), 1);
        assert!(player.is_frozen());
        {
            let table = dealer.state.table.lock().await;
            assert_eq!(table.cards(), vec![9, 10, 11]);
            assert!(table.selection(0).is_empty());
            assert!(table.is_consistent());
        }
        assert_eq!(card_total(&dealer).await + 3, 6);
        assert_eq!(dealer.countdown.remaining(), 10_000);
        for slot in 0..3 {
            assert!(recorder.events().contains(&UiEvent::RemoveCard { slot }));
        }

        time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(player.score(), 1);
        assert!(!player.is_frozen());
        assert_eq!(player.verdict().await, Verdict::Pending);
        assert!(recorder.events().contains(&UiEvent::SetScore { player: 0, score: 1 }));

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_claim_penalizes_and_clears_selection() {
        let (mut dealer, recorder) = new_dealer(settings(), vec![0, 1, 3, 9]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 1, 2]).await;
        let claim = next_claim(&mut dealer).await;
        dealer.check_claims(claim).await;

        assert_eq!(player.verdict().await, Verdict::Rejected);
        assert!(player.is_frozen());
        assert_eq!(dealer.state.table.lock().await.cards(), vec![0, 1, 3]);
        assert_eq!(dealer.deck.cards(), vec![9]);
        assert!(!player.key_pressed(0).await);

        time::sleep(Duration::from_millis(2_500)).await;
        assert!(player.is_frozen());
        assert_eq!(dealer.state.table.lock().await.selection(0).len(), 3);

        time::sleep(Duration::from_millis(1_000)).await;
        assert!(!player.is_frozen());
        assert_eq!(player.score(), 0);
        assert!(dealer.state.table.lock().await.selection(0).is_empty());
        assert_eq!(recorder.freezes(0), vec![3_000, 2_000, 1_000, 0]);
        assert_eq!(card_total(&dealer).await, 4);

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_claims_are_judged_in_submission_order() {
        // Both players claim the same match; only the first one can win it.
        let (mut dealer, _recorder) = new_dealer(settings(), vec![0, 1, 2, 9, 10, 11]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let first = Arc::clone(&dealer.players[1]);
        let second = Arc::clone(&dealer.players[0]);

        select_all(&first, &[0, 1, 2]).await;
        time::sleep(Duration::from_millis(10)).await;
        select_all(&second, &[0, 1, 2]).await;
        time::sleep(Duration::from_millis(10)).await;

        let claim = next_claim(&mut dealer).await;
        assert_eq!(claim.player, 1);
        dealer.check_claims(claim).await;

        assert_eq!(first.verdict().await, Verdict::Accepted);
        assert_eq!(second.verdict().await, Verdict::Pending);
        assert!(!second.is_frozen());
        assert!(dealer.claims.try_recv().is_err());

        time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(first.score(), 1);
        assert_eq!(second.score(), 0);

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_ticket_is_skipped() {
        let (mut dealer, recorder) = new_dealer(settings(), vec![0, 1, 2, 9]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 1, 2]).await;
        let claim = next_claim(&mut dealer).await;
        assert_eq!(claim.ticket, 1);

        dealer
            .check_claims(Claim {
                player: 0,
                ticket: 0,
            })
            .await;
        assert_eq!(player.verdict().await, Verdict::Pending);
        assert!(!player.is_frozen());
        assert_eq!(player.score(), 0);
        assert_eq!(dealer.state.table.lock().await.selection(0).len(), 3);
        assert!(recorder.freezes(0).is_empty());

        dealer.check_claims(claim).await;
        assert_eq!(player.verdict().await, Verdict::Accepted);
        assert_eq!(player.score(), 1);

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_claim_around_freeze_end_is_skipped() {
        let (mut dealer, recorder) = new_dealer(settings(), vec![0, 1, 3, 9]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 1, 2]).await;
        let claim = next_claim(&mut dealer).await;
        dealer.check_claims(claim).await;
        assert_eq!(player.verdict().await, Verdict::Rejected);

        // same ticket, full selection, but the penalty is still running
        time::sleep(Duration::from_millis(2_500)).await;
        dealer.check_claims(claim).await;
        assert_eq!(recorder.freezes(0), vec![3_000, 2_000, 1_000]);

        time::sleep(Duration::from_millis(1_000)).await;
        dealer.check_claims(claim).await;

        assert!(!player.is_frozen());
        assert_eq!(player.verdict().await, Verdict::Pending);
        assert!(dealer.state.table.lock().await.selection(0).is_empty());
        assert_eq!(recorder.freezes(0), vec![3_000, 2_000, 1_000, 0]);
        assert!(player.key_pressed(0).await);

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_claims_after_game_over_are_not_judged() {
        let settings = Settings {
            columns: 6,
            player_keys: vec!["abcdef".to_string(), "ghijkl".to_string()],
            ..settings()
        };
        // 0,1,2 is the only match; 3,4,6 is left on the table
        let (mut dealer, _recorder) = new_dealer(settings, vec![0, 1, 2, 3, 4, 6]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let winner = Arc::clone(&dealer.players[1]);
        let late = Arc::clone(&dealer.players[0]);

        select_all(&winner, &[0, 1, 2]).await;
        time::sleep(Duration::from_millis(10)).await;
        select_all(&late, &[3, 4, 5]).await;
        time::sleep(Duration::from_millis(10)).await;

        let claim = next_claim(&mut dealer).await;
        assert_eq!(claim.player, 1);
        dealer.check_claims(claim).await;

        assert!(dealer.state.is_game_over());
        assert_eq!(winner.verdict().await, Verdict::Accepted);
        assert_eq!(late.verdict().await, Verdict::Pending);
        assert!(!late.is_frozen());
        assert_eq!(dealer.claims.try_recv().map(|c| c.player), Ok(0));

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_returns_cards_and_clears_selections() {
        let (mut dealer, _recorder) = new_dealer(settings(), vec![0, 1, 3, 9]);
        dealer.place_cards().await;
        dealer.state.set_dealing(false);
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 2]).await;
        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(dealer.state.table.lock().await.selection(0).len(), 2);

        dealer.state.set_dealing(true);
        dealer.remove_all_cards().await;

        let table = dealer.state.table.lock().await;
        assert_eq!(table.count(), 0);
        assert!(table.selection(0).is_empty());
        drop(table);
        let mut deck = dealer.deck.cards();
        deck.sort();
        assert_eq!(deck, vec![0, 1, 3, 9]);

        dealer.shutdown(None, workers).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_when_no_match_in_play() {
        let (dealer, _recorder) = new_dealer(settings(), vec![1, 3, 5]);
        assert!(dealer.should_finish().await);

        let (dealer, _recorder) = new_dealer(settings(), vec![1, 3, 5, 0, 2]);
        assert!(!dealer.should_finish().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_untimed_round_ends_without_match_on_table() {
        let settings = Settings {
            turn_timeout_millis: -1,
            ..settings()
        };
        let (mut dealer, _recorder) = new_dealer(settings, vec![1, 3, 5, 0, 2]);
        dealer.place_cards().await;
        assert!(dealer.no_matches_on_table().await);
        assert!(!dealer.round_active().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_expiry_forces_reshuffle() {
        let settings = Settings {
            rows: 1,
            columns: 4,
            player_keys: vec!["abcd".to_string(), "efgh".to_string()],
            turn_timeout_millis: 3_000,
            ..settings()
        };
        let mut cards: Vec<usize> = (0..27).collect();
        cards.retain(|&c| c != 2);
        let (dealer, recorder) = new_dealer(settings, cards);
        let handle = dealer.handle();
        let player = Arc::clone(&dealer.players[0]);
        let game = tokio::spawn(dealer.run());

        time::sleep(Duration::from_millis(500)).await;
        let first_round = recorder.count(|e| matches!(e, UiEvent::PlaceCard { .. }));
        assert_eq!(first_round, 4);
        assert!(player.key_pressed(0).await);
        time::sleep(Duration::from_millis(10)).await;

        // expiry sweeps the board, even with a selection in flight, and deals again
        time::sleep(Duration::from_millis(3_000)).await;
        assert_eq!(recorder.count(|e| matches!(e, UiEvent::RemoveCard { .. })), 4);
        assert_eq!(recorder.count(|e| matches!(e, UiEvent::PlaceCard { .. })), 8);
        assert!(recorder.events().contains(&UiEvent::RemoveToken { player: 0, slot: 0 }));

        handle.terminate();
        let status = time::timeout(Duration::from_secs(1), game)
            .await
            .expect("dealer should stop")
            .unwrap();
        assert_eq!(status.code, ExitCode::Interrupted as i32);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_during_freeze_stops_everything() {
        let settings = Settings {
            penalty_freeze_millis: 60_000,
            ..settings()
        };
        let (mut dealer, recorder) = new_dealer(settings, vec![0, 1, 3, 9]);
        dealer.place_cards().await;
        dealer.countdown.reset();
        dealer.state.set_dealing(false);
        let timer = Some(tokio::spawn(Arc::clone(&dealer.countdown).run()));
        let workers = spawn_players(&dealer);
        let player = Arc::clone(&dealer.players[0]);

        select_all(&player, &[0, 1, 2]).await;
        let claim = next_claim(&mut dealer).await;
        dealer.check_claims(claim).await;
        time::sleep(Duration::from_millis(5_500)).await;
        assert!(player.is_frozen());

        dealer.handle().terminate();
        time::timeout(Duration::from_millis(10), dealer.shutdown(timer, workers))
            .await
            .expect("workers should stop without serving the freeze");

        assert!(player.is_terminated());
        assert!(!player.is_frozen());
        let freezes = recorder.freezes(0);
        assert_eq!(freezes.first(), Some(&60_000));
        assert_eq!(freezes.last(), Some(&0));
        assert_eq!(freezes.len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_runs_to_completion_and_announces_winners() {
        let settings = Settings {
            human_players: 0,
            computer_players: 2,
            rows: 1,
            columns: 3,
            player_keys: vec!["abc".to_string(), "def".to_string()],
            turn_timeout_millis: -1,
            point_freeze_millis: 0,
            penalty_freeze_millis: 0,
            computer_delay_millis: 10,
            ..settings()
        };
        // exactly one match exists among these cards
        let (dealer, recorder) = new_dealer(settings, vec![0, 1, 2]);
        let game = tokio::spawn(dealer.run());

        let status = time::timeout(Duration::from_secs(600), game)
            .await
            .expect("computers should find the only match")
            .unwrap();
        assert_eq!(status.code, ExitCode::GameOver as i32);

        let winners = recorder.events().into_iter().find_map(|e| match e {
            UiEvent::AnnounceWinners { players } => Some(players),
            _ => None,
        });
        let winners = winners.expect("winners announced");
        assert_eq!(winners.len(), 1);
        assert!(recorder.events().contains(&UiEvent::SetScore { player: winners[0], score: 1 }));
        assert_eq!(recorder.events().last(), Some(&UiEvent::Dispose));
    }
}
