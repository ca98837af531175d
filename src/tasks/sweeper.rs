//! TTL Sweep Task
//!
//! Background task that periodically reclaims expired TTL cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Sweeper Handle ==
/// Owner of a running sweep task.
///
/// Cancellation is only observed between sweeps, so a sweep that has started
/// always finishes. Dropping the handle cancels the task; use
/// [`SweeperHandle::shutdown`] to also wait for it to exit.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the task to stop before its next sweep.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Err(err) = (&mut self.handle).await {
            warn!(error = %err, "TTL sweep task ended abnormally");
        }
    }
}

/// Stops the sweep task (and releases its cache) when the handle goes away
impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!("SweeperHandle dropped while running; cancelling");
            self.token.cancel();
        }
    }
}

/// Spawns a background task that calls [`TtlCache::delete_expired`] every
/// `interval` until cancelled.
///
/// The first sweep runs one full interval after spawning. Must be called from
/// within a tokio runtime.
///
/// # Errors
/// Returns [`CacheError::InvalidInterval`] when `interval` is zero.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(TtlCache::new());
/// let sweeper = spawn_sweeper(cache.clone(), Duration::from_secs(1))?;
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweeper<K, V, C>(
    cache: Arc<TtlCache<K, V, C>>,
    interval: Duration,
) -> Result<SweeperHandle>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock,
{
    if interval.is_zero() {
        return Err(CacheError::InvalidInterval(interval));
    }

    let token = CancellationToken::new();
    let cancel = token.clone();

    let handle = tokio::spawn(async move {
        info!(
            interval_ms = interval.as_millis() as u64,
            "Starting TTL sweep task"
        );

        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = cache.delete_expired();
                    if removed > 0 {
                        info!(removed, "TTL sweep: removed expired entries");
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    });

    Ok(SweeperHandle { token, handle })
}

/// Spawns a sweeper using `config.sweep_interval`.
pub fn spawn_sweeper_from_config<K, V, C>(
    cache: Arc<TtlCache<K, V, C>>,
    config: &Config,
) -> Result<SweeperHandle>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    C: Clock,
{
    spawn_sweeper(cache, config.sweep_interval)
}
