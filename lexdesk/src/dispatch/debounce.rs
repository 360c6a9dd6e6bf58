use std::{future::Future, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};

/// Holds at most one pending timer. Scheduling again aborts the pending one
/// and restarts the quiet period.
pub struct Debouncer {
    quiet_period: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: Mutex::new(None),
        }
    }

    /// Run `fire` once the quiet period passes without another call.
    ///
    /// Only the timer is aborted by later calls. Once `fire` has started it
    /// runs on its own task to completion.
    pub async fn schedule<F>(&self, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().await;
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let quiet_period = self.quiet_period;
        *pending = Some(tokio::spawn(async move {
            sleep(quiet_period).await;
            tokio::spawn(fire);
        }));
    }
}
