//! Cache Sweep Task
//!
//! Background task that periodically drops cache entries older than the
//! longest duration class, whether or not anything reads them again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ResponseCache;

/// Spawns a background task that sweeps the cache every `interval_secs`.
///
/// The first sweep runs one interval after start. The task exits once
/// `shutdown_rx` observes `true` or its sender is dropped.
///
/// # Arguments
/// * `cache` - Shared response cache
/// * `interval_secs` - Seconds between sweeps (0 is treated as 1)
/// * `shutdown_rx` - Stop signal from the composition root
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let sweep_handle = spawn_sweep_task(cache.clone(), 600, shutdown_rx);
/// // Later, during shutdown:
/// let _ = shutdown_tx.send(true);
/// sweep_handle.await?;
/// ```
pub fn spawn_sweep_task(
    cache: Arc<ResponseCache>,
    interval_secs: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            period.as_secs()
        );

        let mut interval = tokio::time::interval(period);
        interval.tick().await; // skip first immediate tick

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = cache.sweep_expired().await;
                    if removed > 0 {
                        info!("Cache sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Cache sweep: no expired entries found");
                    }
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Cache sweep task shutting down");
                        break;
                    }
                }
            }
        }
    })
}
