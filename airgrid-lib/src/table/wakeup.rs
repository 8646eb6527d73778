//! Redraw signals from a [`SearchTable`](super::SearchTable).
//!
//! A table keeps at most one unread signal per subscriber. A change that
//! lands while a signal is still unread adds nothing, since the reader
//! renders the latest state either way.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tokio::sync::mpsc;

/// Receives a signal whenever the subscribed table changes visibly.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Waits for the next change.
    ///
    /// Returns `None` after the table was deactivated (or a newer
    /// subscriber replaced this one) and the last signal was read.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Discards a signal that is already waiting, if any.
    pub fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// The table's side of the subscription.
#[derive(Debug, Default, Clone)]
pub(crate) struct Notifier {
    subscriber: Arc<Mutex<Option<mpsc::Sender<()>>>>,
}

impl Notifier {
    fn slot(&self) -> MutexGuard<'_, Option<mpsc::Sender<()>>> {
        self.subscriber.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Opens a new subscription, ending the previous one.
    pub(crate) fn subscribe(&self) -> WakeupReceiver {
        let (tx, rx) = mpsc::channel(1);
        *self.slot() = Some(tx);
        WakeupReceiver { rx }
    }

    /// Signals the subscriber without waiting; a full buffer or a dropped
    /// receiver is fine.
    pub(crate) fn notify(&self) {
        if let Some(tx) = self.slot().as_ref() {
            let _ = tx.try_send(());
        }
    }

    /// Ends the subscription; the receiver sees `None` once drained.
    pub(crate) fn close(&self) {
        self.slot().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_signals_collapse() {
        let notifier = Notifier::default();
        let mut rx = notifier.subscribe();

        notifier.notify();
        notifier.notify();
        notifier.notify();
        assert_eq!(rx.recv().await, Some(()));

        notifier.close();
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_new_subscriber_replaces_old() {
        let notifier = Notifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify();
        assert_eq!(first.recv().await, None);
        assert_eq!(second.recv().await, Some(()));
    }

    #[test]
    fn test_notify_without_subscriber() {
        Notifier::default().notify();
    }
}
