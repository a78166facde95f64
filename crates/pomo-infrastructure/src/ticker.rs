//! A `Ticker` backed by a tokio interval task.

use std::time::Duration;

use pomo_core::ticker::{Registration, Ticker};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::debug;

/// Sends a tick message on a channel once per period while registered.
///
/// The receiving end belongs to the event loop that owns the coordinator, so
/// ticks are applied on the same logical thread as user input. Each message
/// is built from the id of the registration that produced it; stopping
/// aborts the interval task, but ticks it already queued stay in the channel
/// and must be matched against the live registration by the receiver.
pub struct TokioTicker<M> {
    runtime: Handle,
    sender: UnboundedSender<M>,
    message: fn(Registration) -> M,
    last_registration: Registration,
    task: Option<JoinHandle<()>>,
}

impl<M> TokioTicker<M>
where
    M: Send + 'static,
{
    /// Creates an idle ticker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(sender: UnboundedSender<M>, message: fn(Registration) -> M) -> Self {
        Self::with_handle(Handle::current(), sender, message)
    }

    pub fn with_handle(
        runtime: Handle,
        sender: UnboundedSender<M>,
        message: fn(Registration) -> M,
    ) -> Self {
        Self {
            runtime,
            sender,
            message,
            last_registration: 0,
            task: None,
        }
    }
}

impl<M> Ticker for TokioTicker<M>
where
    M: Send + 'static,
{
    fn start(&mut self, period: Duration) -> Registration {
        self.stop();
        self.last_registration += 1;
        let registration = self.last_registration;
        let sender = self.sender.clone();
        let message = self.message;
        self.task = Some(self.runtime.spawn(async move {
            // First tick one full period from now, like a browser interval.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if sender.send(message(registration)).is_err() {
                    break;
                }
            }
        }));
        debug!(?period, registration, "Ticker registered");
        registration
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(registration = self.last_registration, "Ticker cancelled");
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn registration(&self) -> Option<Registration> {
        self.is_running().then_some(self.last_registration)
    }
}

impl<M> Drop for TokioTicker<M> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Registration>();
        let mut ticker = TokioTicker::new(tx, |registration| registration);
        let started = Instant::now();

        let registration = ticker.start(Duration::from_secs(1));
        assert!(ticker.is_running());
        assert_eq!(ticker.registration(), Some(registration));

        assert_eq!(rx.recv().await, Some(registration));
        assert_eq!(rx.recv().await, Some(registration));
        assert!(started.elapsed() >= Duration::from_secs(2));
        ticker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_and_is_idempotent() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        let mut ticker = TokioTicker::new(tx, |_| 1);

        ticker.stop();
        ticker.start(Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(1));

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.registration(), None);
        assert!(timeout(Duration::from_secs(5), rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_registration() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Registration>();
        let mut ticker = TokioTicker::new(tx, |registration| registration);

        let first = ticker.start(Duration::from_secs(1));
        let second = ticker.start(Duration::from_secs(1));
        assert_ne!(first, second);
        tokio::time::sleep(Duration::from_millis(3500)).await;
        ticker.stop();

        let mut received = Vec::new();
        while let Ok(registration) = rx.try_recv() {
            received.push(registration);
        }
        // One live registration: ticks at 1s, 2s and 3s only.
        assert_eq!(received, vec![second; 3]);
    }
}
