use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time;

use super::presenter::Presenter;
use super::shutdown::Shutdown;
use crate::logger;

const SECOND: i64 = 1000;
const WARNING_TICKS: i64 = 10;

/// Round timer driving forced reshuffles.
///
/// A positive total counts down and expires at zero. A zero total counts
/// elapsed time up and never expires. A negative total disables the timer,
/// the dealer does not spawn the worker at all.
///
/// The worker owns `remaining` while running; the dealer only touches it
/// through [`Countdown::reset`].
pub struct Countdown {
    total: i64,
    warning: i64,
    remaining: AtomicI64,
    reset: AtomicBool,
    restart: Notify,
    expired: Notify,
    shutdown: Shutdown,
    presenter: Arc<dyn Presenter>,
}

impl Countdown {
    pub fn new(total: i64, warning: i64, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            total,
            warning,
            remaining: AtomicI64::new(total),
            reset: AtomicBool::new(false),
            restart: Notify::new(),
            expired: Notify::new(),
            shutdown: Shutdown::new(),
            presenter,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.total >= 0
    }

    pub fn counts_down(&self) -> bool {
        self.total > 0
    }

    pub fn remaining(&self) -> i64 {
        self.remaining.load(Ordering::SeqCst)
    }

    pub fn is_expired(&self) -> bool {
        self.counts_down() && self.remaining() <= 0
    }

    /// Restores the full duration and lets an expired worker run again.
    pub fn reset(&self) {
        self.remaining.store(self.total, Ordering::SeqCst);
        self.reset.store(true, Ordering::SeqCst);
        self.restart.notify_one();
    }

    /// Resolves once the countdown has reached zero.
    pub async fn expired(&self) {
        while !self.is_expired() {
            self.expired.notified().await;
        }
    }

    pub fn terminate(&self) {
        self.shutdown.trigger();
    }

    pub async fn run(self: Arc<Self>) {
        logger!(INFO, "[COUNTDOWN] Starting ({} ms)", self.total);

        loop {
            if !self.await_reset().await {
                break;
            }
            self.remaining.store(self.total, Ordering::SeqCst);

            if !self.run_down().await {
                break;
            }

            self.presenter.set_countdown(0, true);
            logger!(DEBUG, "[COUNTDOWN] Expired");
            self.expired.notify_one();
        }

        logger!(INFO, "[COUNTDOWN] Terminated");
    }

    /// Blocks until the dealer asks for a new run. Returns false on termination.
    async fn await_reset(&self) -> bool {
        loop {
            if self.shutdown.is_triggered() {
                return false;
            }
            if self.reset.swap(false, Ordering::SeqCst) {
                return true;
            }
            tokio::select! {
                _ = self.restart.notified() => {}
                _ = self.shutdown.triggered() => return false,
            }
        }
    }

    /// Ticks until the remaining time reaches zero. Returns false on termination.
    async fn run_down(&self) -> bool {
        let step = if self.total == 0 { -SECOND } else { SECOND };

        while self.remaining() > 0 || self.total == 0 {
            if self.reset.swap(false, Ordering::SeqCst) {
                self.remaining.store(self.total, Ordering::SeqCst);
            }
            let time = self.remaining();

            if self.total == 0 {
                self.presenter.set_elapsed(time);
                if !self.sleep(SECOND).await {
                    return false;
                }
            } else if time > self.warning {
                self.presenter.set_countdown(time, false);
                if !self.sleep(SECOND).await {
                    return false;
                }
            } else {
                // Tenths of a second for a smoother display near the end.
                for tick in (0..WARNING_TICKS).rev() {
                    let shown = (time + tick * (SECOND / WARNING_TICKS) - SECOND).max(0);
                    self.presenter.set_countdown(shown, true);
                    if !self.sleep(SECOND / WARNING_TICKS).await {
                        return false;
                    }
                }
            }

            self.remaining.fetch_sub(step, Ordering::SeqCst);
        }

        true
    }

    async fn sleep(&self, millis: i64) -> bool {
        tokio::select! {
            _ = time::sleep(Duration::from_millis(millis as u64)) => true,
            _ = self.shutdown.triggered() => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::presenter::recorder::Recorder;
    use crate::models::ui_event::UiEvent;

    fn countdown(total: i64, warning: i64) -> (Arc<Countdown>, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        let countdown = Arc::new(Countdown::new(total, warning, Arc::clone(&recorder) as Arc<dyn Presenter>));
        (countdown, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_first_reset() {
        let (countdown, recorder) = countdown(3_000, 0);
        let worker = tokio::spawn(Arc::clone(&countdown).run());

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(countdown.remaining(), 3_000);
        assert!(recorder.events().is_empty());

        countdown.terminate();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_total_duration() {
        let (countdown, _recorder) = countdown(3_000, 0);
        let worker = tokio::spawn(Arc::clone(&countdown).run());
        countdown.reset();

        time::timeout(Duration::from_millis(3_500), countdown.expired())
            .await
            .expect("countdown should expire");
        assert!(countdown.is_expired());

        countdown.terminate();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_restores_full_duration() {
        let (countdown, _recorder) = countdown(3_000, 0);
        let worker = tokio::spawn(Arc::clone(&countdown).run());
        countdown.reset();

        time::sleep(Duration::from_millis(2_500)).await;
        countdown.reset();
        assert_eq!(countdown.remaining(), 3_000);
        assert!(time::timeout(Duration::from_millis(2_000), countdown.expired()).await.is_err());

        countdown.terminate();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_warning_uses_tenths() {
        let (countdown, recorder) = countdown(2_000, 1_000);
        let worker = tokio::spawn(Arc::clone(&countdown).run());
        countdown.reset();
        countdown.expired().await;

        let warnings = recorder.count(|e| matches!(e, UiEvent::SetCountdown { warning: true, .. }));
        // ten tenths for the last second, then the final zero
        assert_eq!(warnings, 11);
        assert!(recorder.events().contains(&UiEvent::SetCountdown { millis: 2_000, warning: false }));

        countdown.terminate();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_total_counts_up_and_never_expires() {
        let (countdown, recorder) = countdown(0, 0);
        let worker = tokio::spawn(Arc::clone(&countdown).run());
        countdown.reset();

        time::sleep(Duration::from_millis(3_500)).await;
        assert!(!countdown.is_expired());
        assert!(countdown.remaining() >= 3_000);
        assert!(recorder.events().contains(&UiEvent::SetElapsed { millis: 2_000 }));

        countdown.terminate();
        worker.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_interrupts_sleep() {
        let (countdown, _recorder) = countdown(60_000, 0);
        let worker = tokio::spawn(Arc::clone(&countdown).run());
        countdown.reset();
        tokio::task::yield_now().await;

        countdown.terminate();
        time::timeout(Duration::from_millis(10), worker)
            .await
            .expect("worker should stop promptly")
            .unwrap();
    }
}
