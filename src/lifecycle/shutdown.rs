//! Shutdown coordination for the poll loop.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that long-running loops can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to a loop.
///
/// A trigger sent while the holder is busy stays buffered, so the next
/// [`ShutdownSignal::recv`] returns immediately.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Wait until shutdown is triggered.
    ///
    /// If the coordinator is dropped without triggering, this never resolves.
    pub async fn recv(&mut self) {
        match self.rx.recv().await {
            Ok(()) | Err(RecvError::Lagged(_)) => {}
            Err(RecvError::Closed) => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_before_recv_is_buffered() {
        let shutdown = Shutdown::new();
        let mut signal = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("buffered trigger should be observed");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_coordinator_never_signals() {
        let shutdown = Shutdown::new();
        let mut signal = shutdown.subscribe();
        drop(shutdown);

        let waited = tokio::time::timeout(Duration::from_secs(60), signal.recv()).await;
        assert!(waited.is_err());
    }
}
