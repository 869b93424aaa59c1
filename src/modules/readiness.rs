// One-shot "engine handle constructed" signal.

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::BrowserError;

/// Given to the engine's lifecycle callback. Consumed on use, so a handle
/// can only be announced once.
#[derive(Debug)]
pub struct ReadyNotifier {
    tx: oneshot::Sender<()>,
}

impl ReadyNotifier {
    pub fn notify(self) {
        if self.tx.send(()).is_err() {
            log::debug!("[Readiness] Nobody is waiting for the ready signal");
        }
    }
}

/// A [`ReadyNotifier`] that can be fired through `&self`, for lifecycle
/// callbacks that run more than once. Only the first call notifies.
#[derive(Debug)]
pub struct SharedNotifier {
    slot: Mutex<Option<ReadyNotifier>>,
}

impl SharedNotifier {
    pub fn new(notifier: ReadyNotifier) -> Self {
        Self {
            slot: Mutex::new(Some(notifier)),
        }
    }

    /// Returns true if this call fired the notifier.
    pub fn notify(&self) -> bool {
        let notifier = self.slot.lock().take();
        match notifier {
            Some(notifier) => {
                notifier.notify();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct ReadySignal {
    rx: oneshot::Receiver<()>,
}

impl ReadySignal {
    pub async fn wait(self) -> Result<(), BrowserError> {
        self.rx.await.map_err(|_| BrowserError::NotifierDropped)
    }
}

pub fn ready_channel() -> (ReadyNotifier, ReadySignal) {
    let (tx, rx) = oneshot::channel();
    (ReadyNotifier { tx }, ReadySignal { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_resolves_wait() {
        let (notifier, signal) = ready_channel();
        let waiter = tokio::spawn(signal.wait());

        notifier.notify();

        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_dropped_notifier_fails_wait() {
        let (notifier, signal) = ready_channel();
        drop(notifier);

        assert!(matches!(signal.wait().await, Err(BrowserError::NotifierDropped)));
    }

    #[tokio::test]
    async fn test_shared_notifier_fires_once() {
        let (notifier, signal) = ready_channel();
        let shared = SharedNotifier::new(notifier);

        assert!(shared.notify());
        assert!(!shared.notify());
        assert!(signal.wait().await.is_ok());
    }

    #[test]
    fn test_notify_without_waiter_is_harmless() {
        let (notifier, signal) = ready_channel();
        drop(signal);
        notifier.notify();
    }
}
