// Background maintenance worker: invalidates entities whose snapshots stopped
// arriving and periodically logs ingestion totals.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tokio::time::{Duration, interval};
use tracing::Instrument;

use crate::hub::{HubCounters, SharedHub, lock_hub};

pub struct WorkerDeps {
    pub hub: SharedHub,
    pub counters: Arc<HubCounters>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Stale checks and stats logging run on independent real-time intervals.
pub struct WorkerConfig {
    pub stale_check_interval_ms: u64,
    /// Entities without an update for this long are invalidated.
    pub stale_after: Duration,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        hub,
        counters,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        stale_check_interval_ms,
        stale_after,
        stats_log_interval_secs,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", stale_check_interval_ms);

    tokio::spawn(async move {
        let mut stale_tick = interval(Duration::from_millis(stale_check_interval_ms));
        stale_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stale_tick.tick() => {
                    check_stale(&hub, &counters, stale_after);
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        snapshots_applied_total = counters.applied.load(Ordering::Relaxed),
                        snapshots_rejected_total = counters.rejected.load(Ordering::Relaxed),
                        invalidated_total = counters.invalidated.load(Ordering::Relaxed),
                        "app stats"
                    );
                }
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
            }
        }
    }
    .instrument(worker_span))
}

fn check_stale(hub: &SharedHub, counters: &HubCounters, stale_after: Duration) {
    match lock_hub(hub) {
        Ok(mut guard) => {
            let n = guard.invalidate_stale(std::time::Instant::now(), stale_after);
            if n > 0 {
                counters.invalidated.fetch_add(n as u64, Ordering::Relaxed);
                tracing::info!(entities = n, "invalidated stale stats");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "invalidate_stale", "stale check failed");
        }
    }
}
