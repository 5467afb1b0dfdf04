//! Shutdown coordination for the sidecar.

use std::future::Future;
use std::time::Duration;

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
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
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive `work` to completion, allowing at most `grace` once shutdown fires.
///
/// Returns `None` when the grace period ran out first. A closed channel
/// counts as a shutdown signal.
pub async fn drain_with_grace<F>(
    work: F,
    mut shutdown: broadcast::Receiver<()>,
    grace: Duration,
) -> Option<F::Output>
where
    F: Future,
{
    tokio::pin!(work);

    tokio::select! {
        output = &mut work => return Some(output),
        _ = shutdown.recv() => {}
    }

    tokio::time::timeout(grace, &mut work).await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_all_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_work_finishing_first_returns_output() {
        let shutdown = Shutdown::new();
        let out = drain_with_grace(async { 7 }, shutdown.subscribe(), Duration::from_secs(1)).await;
        assert_eq!(out, Some(7));
    }

    #[tokio::test]
    async fn test_work_finishing_within_grace() {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        shutdown.trigger();

        let work = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "drained"
        };
        let out = drain_with_grace(work, rx, Duration::from_secs(2)).await;
        assert_eq!(out, Some("drained"));
    }

    #[tokio::test]
    async fn test_grace_elapses() {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        shutdown.trigger();

        let started = tokio::time::Instant::now();
        let out = drain_with_grace(
            std::future::pending::<()>(),
            rx,
            Duration::from_millis(100),
        )
        .await;
        assert_eq!(out, None);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
