use crate::cache::store::{CacheStore, DEFAULT_TTL};
use crate::utils::metrics::{MetricsRegistry, CACHE_ENTRIES, CACHE_SWEPT};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Fixed cadence of the background sweep.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Sweep cadence and the single TTL the sweep applies to every entry.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    pub every: Duration,
    pub default_ttl: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { every: SWEEP_INTERVAL, default_ttl: DEFAULT_TTL }
    }
}

/// Spawn the periodic sweep. Runs until `shutdown` flips to true (or its
/// sender goes away).
pub fn spawn_sweeper(
    store: CacheStore,
    cfg: SweepConfig,
    metrics: MetricsRegistry,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(cfg.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        info!("cache sweeper started (every {:?}, ttl {:?})", cfg.every, cfg.default_ttl);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = store.sweep(cfg.default_ttl);
                    metrics.add_counter(CACHE_SWEPT, removed as u64);
                    metrics.set_gauge(CACHE_ENTRIES, store.len() as f64);
                    if removed > 0 {
                        debug!(removed, remaining = store.len(), "cache sweep");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("cache sweeper stopped");
        Ok(())
    })
}
