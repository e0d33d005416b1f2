//! Expiry Pruning Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Something holding entries that can expire.
pub trait Prune: Send + Sync + 'static {
    /// Removes every expired entry and returns how many were removed.
    fn prune_expired(&self) -> usize;
}

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval` between sweeps and exits as soon as `token`
/// is cancelled, whether it is sleeping or about to sweep.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let token = CancellationToken::new();
/// let handle = spawn_prune_task(target, Duration::from_secs(60), token.clone());
/// // Later, when the cache goes away:
/// token.cancel();
/// ```
pub fn spawn_prune_task<P: Prune>(
    target: Arc<P>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?interval, "Starting expiry pruning task");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = target.prune_expired();
            if removed > 0 {
                debug!(removed, "Expiry pruning removed entries");
            } else {
                trace!("Expiry pruning found no expired entries");
            }
        }

        info!("Expiry pruning task stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingTarget {
        sweeps: AtomicUsize,
    }

    impl Prune for CountingTarget {
        fn prune_expired(&self) -> usize {
            self.sweeps.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[tokio::test]
    async fn test_prune_task_sweeps_periodically() {
        let target = Arc::new(CountingTarget::default());
        let token = CancellationToken::new();

        let handle = spawn_prune_task(target.clone(), Duration::from_millis(10), token.clone());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(target.sweeps.load(Ordering::SeqCst) >= 2);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_prune_task_waits_a_full_interval() {
        let target = Arc::new(CountingTarget::default());
        let token = CancellationToken::new();

        let handle = spawn_prune_task(target.clone(), Duration::from_secs(3600), token.clone());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(target.sweeps.load(Ordering::SeqCst), 0);

        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_prune_task_stops_on_cancel() {
        let target = Arc::new(CountingTarget::default());
        let token = CancellationToken::new();

        let handle = spawn_prune_task(target.clone(), Duration::from_secs(3600), token.clone());
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should exit promptly after cancellation")
            .unwrap();

        assert_eq!(target.sweeps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prune_task_accepts_unbounded_interval() {
        let target = Arc::new(CountingTarget::default());
        let token = CancellationToken::new();

        let handle = spawn_prune_task(target.clone(), Duration::MAX, token.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should exit promptly after cancellation")
            .unwrap();
        assert_eq!(target.sweeps.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prune_task_cancelled_before_spawn() {
        let target = Arc::new(CountingTarget::default());
        let token = CancellationToken::new();
        token.cancel();

        let handle = spawn_prune_task(target, Duration::from_millis(1), token);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should exit immediately")
            .unwrap();
    }
}
