use tokio::sync::watch;

/// A one-way switch that tasks can poll or await.
///
/// Once triggered it stays triggered, and awaiting an already triggered
/// switch returns immediately, so a trigger can never be missed by a task
/// that starts waiting late.
#[derive(Debug)]
pub struct Shutdown {
    switch: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (switch, _rx) = watch::channel(false);
        Self { switch }
    }

    pub fn trigger(&self) {
        self.switch.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.switch.borrow()
    }

    pub async fn triggered(&self) {
        let mut rx = self.switch.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
