use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex, Notify, RwLock};
use tokio::time;

use super::game_state::GameState;
use super::input::Computer;
use super::shutdown::Shutdown;
use super::table::Toggle;
use crate::logger;
use crate::models::claim::Claim;
use crate::models::verdict::Verdict;

const SECOND: u64 = 1000;

/// A participant and the worker that applies its key presses.
///
/// The worker consumes a bounded queue of slot presses, keeps the player's
/// selection on the table, and once the selection reaches the match size
/// submits a claim and waits for the dealer's verdict. The input side
/// (keyboard or [`Computer`]) only ever calls [`Player::key_pressed`].
pub struct Player {
    pub id: usize,
    pub name: String,
    human: bool,
    state: Arc<GameState>,
    score: AtomicU32,
    frozen: AtomicBool,
    tickets: AtomicU64,
    verdict: RwLock<Verdict>,
    actions: mpsc::Sender<usize>,
    queue: Mutex<mpsc::Receiver<usize>>,
    /// Verdicts and selection changes made by the dealer.
    wake: Notify,
    /// Wakes the computer input worker once the queue drains or the freeze ends.
    input: Notify,
    shutdown: Shutdown,
}

impl Player {
    pub fn new(id: usize, state: Arc<GameState>) -> Self {
        let (actions, queue) = mpsc::channel(state.match_size());
        Self {
            id,
            name: state.settings.player_name(id),
            human: state.settings.is_human(id),
            state,
            score: AtomicU32::new(0),
            frozen: AtomicBool::new(false),
            tickets: AtomicU64::new(0),
            verdict: RwLock::new(Verdict::Pending),
            actions,
            queue: Mutex::new(queue),
            wake: Notify::new(),
            input: Notify::new(),
            shutdown: Shutdown::new(),
        }
    }

    pub fn is_human(&self) -> bool {
        self.human
    }

    pub fn score(&self) -> u32 {
        self.score.load(Ordering::SeqCst)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    pub fn is_queue_full(&self) -> bool {
        self.actions.capacity() == 0
    }

    pub fn is_terminated(&self) -> bool {
        self.shutdown.is_triggered()
    }

    pub async fn terminated(&self) {
        self.shutdown.triggered().await
    }

    /// The ticket of the most recent claim this player submitted.
    pub fn ticket(&self) -> u64 {
        self.tickets.load(Ordering::SeqCst)
    }

    pub async fn verdict(&self) -> Verdict {
        *self.verdict.read().await
    }

    /// Called by the dealer, with the table lock held, before judging a claim.
    pub fn freeze(&self) {
        self.frozen.store(true, Ordering::SeqCst);
    }

    /// Called by the dealer, with the table lock held, once a claim is judged.
    /// An accepted claim scores right away so the point is already counted
    /// if the game ends while the player serves its freeze.
    pub async fn set_verdict(&self, verdict: Verdict) {
        if verdict == Verdict::Accepted {
            let score = self.score.fetch_add(1, Ordering::SeqCst) + 1;
            self.state.presenter.set_score(self.id, score);
        }
        *self.verdict.write().await = verdict;
    }

    /// Makes the worker recheck its verdict and selection.
    pub fn wake(&self) {
        self.wake.notify_one();
    }

    pub fn terminate(&self) {
        self.shutdown.trigger();
    }

    pub(crate) async fn input_ready(&self) {
        self.input.notified().await
    }

    /// Queues a press on `slot`. Returns false when the press is refused:
    /// the table is being dealt, the slot is empty, the player is frozen, the
    /// game is ending, the queue is full, or the selection is full and the
    /// press would add a new card rather than drop a selected one.
    pub async fn key_pressed(&self, slot: usize) -> bool {
        if self.state.is_dealing()
            || self.is_frozen()
            || self.state.is_terminating()
            || self.is_terminated()
        {
            return false;
        }

        {
            let table = self.state.table.lock().await;
            let Some(card) = table.card(slot) else {
                return false;
            };
            if table.selection(self.id).len() >= self.state.match_size()
                && !table.is_selected(self.id, card)
            {
                return false;
            }
        }

        self.actions.try_send(slot).is_ok()
    }

    /// The player's worker loop. `ready` fires once the worker (and its
    /// computer input, if any) is up.
    pub async fn run(self: Arc<Self>, ready: oneshot::Sender<()>) {
        logger!(INFO, "[PLAYER {}] `{}` starting", self.id, self.name);

        let computer = (!self.human).then(|| {
            let computer = Computer::new(
                Arc::clone(&self),
                self.state.settings.table_size(),
                self.state.settings.computer_delay(),
            );
            tokio::spawn(computer.run())
        });
        let _ = ready.send(());

        let mut queue = self.queue.lock().await;
        loop {
            let slot = tokio::select! {
                biased;
                _ = self.shutdown.triggered() => None,
                slot = queue.recv() => slot,
            };
            let Some(slot) = slot else {
                break;
            };

            if let Some(ticket) = self.perform_action(slot).await {
                self.state.submit_claim(Claim {
                    player: self.id,
                    ticket,
                });

                if let Some(verdict) = self.await_verdict().await {
                    match verdict {
                        Verdict::Accepted => self.point().await,
                        Verdict::Rejected => self.penalty().await,
                        Verdict::Pending => {}
                    }
                    while queue.try_recv().is_ok() {}
                    self.finish_verdict(verdict).await;
                }
            }

            self.input.notify_one();
        }
        drop(queue);

        if let Some(computer) = computer {
            let _ = computer.await;
        }
        logger!(INFO, "[PLAYER {}] `{}` terminated", self.id, self.name);
    }

    /// Applies one press to the selection. When the press completes a full
    /// selection, the only moment a claim is made, returns the new claim's
    /// ticket. The ticket moves under the table lock, together with the
    /// selection it stands for.
    async fn perform_action(&self, slot: usize) -> Option<u64> {
        let limit = self.state.match_size();
        let mut table = self.state.table.lock().await;
        if self.state.is_dealing() || self.state.is_terminating() {
            return None;
        }

        let before = table.selection(self.id).len();
        let toggle = table.toggle(self.id, slot, limit);
        (toggle == Toggle::Selected && before + 1 == limit)
            .then(|| self.tickets.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Waits for the dealer to judge the claim just submitted.
    ///
    /// Returns `None` without a verdict when the player is terminated or the
    /// claim went stale because the dealer took cards out of the selection.
    async fn await_verdict(&self) -> Option<Verdict> {
        loop {
            if self.is_terminated() {
                return None;
            }

            {
                // The dealer writes the verdict while holding the table lock,
                // so verdict and selection are read as one snapshot.
                let table = self.state.table.lock().await;
                let verdict = *self.verdict.read().await;
                if verdict != Verdict::Pending {
                    return Some(verdict);
                }
                if table.selection(self.id).len() != self.state.match_size() {
                    logger!(DEBUG, "[PLAYER {}] Claim went stale", self.id);
                    return None;
                }
            }

            tokio::select! {
                _ = self.wake.notified() => {}
                _ = self.shutdown.triggered() => return None,
            }
        }
    }

    /// Serves the freeze that follows an accepted claim.
    pub async fn point(&self) {
        self.serve_freeze(self.state.settings.point_freeze()).await;
    }

    /// Serves the penalty freeze. The score is left untouched.
    pub async fn penalty(&self) {
        self.serve_freeze(self.state.settings.penalty_freeze()).await;
    }

    /// Sleeps through `duration` one second at a time, publishing what is
    /// left before each step. Termination cuts the freeze short. The player
    /// stays frozen until [`Player::finish_verdict`].
    async fn serve_freeze(&self, duration: Duration) {
        let mut remaining = duration.as_millis() as u64;
        while remaining > 0 && !self.is_terminated() {
            self.state.presenter.set_freeze(self.id, remaining);
            tokio::select! {
                _ = time::sleep(Duration::from_millis(remaining.min(SECOND))) => {}
                _ = self.shutdown.triggered() => break,
            }
            remaining = remaining.saturating_sub(SECOND);
        }
        self.state.presenter.set_freeze(self.id, 0);
    }

    /// Back to idle: a rejected selection is dropped, the verdict reset and
    /// the player unfrozen, all in one table lock hold so the dealer never
    /// sees an unfrozen player still holding the judged selection.
    async fn finish_verdict(&self, verdict: Verdict) {
        let mut table = self.state.table.lock().await;
        if verdict == Verdict::Rejected {
            table.clear_selection(self.id);
        }
        *self.verdict.write().await = Verdict::Pending;
        self.frozen.store(false, Ordering::SeqCst);
    }
}
