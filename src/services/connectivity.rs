//! Connectivity monitor
//!
//! Background task that probes the catalog and publishes reachability on a
//! `watch` channel. The owner reacts to false → true edges by calling
//! `PagingController::on_connectivity_restored`; the controller never polls.
//!
//! While unreachable, probes back off exponentially from the check interval,
//! capped at 60s. While reachable, probes run every check interval.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Delay before the next probe after `failures` consecutive failed ones
pub fn backoff_delay(check_interval: Duration, failures: u32) -> Duration {
    let factor = 2u32.saturating_pow(failures.min(16));
    std::cmp::min(check_interval.saturating_mul(factor), MAX_BACKOFF)
}

pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<bool>>,
    task: JoinHandle<()>,
}

impl ConnectivityMonitor {
    /// Start probing. The service is assumed reachable until a probe says otherwise.
    pub fn spawn(probe: Arc<dyn ReachabilityProbe>, check_interval: Duration) -> Self {
        let (tx, _) = watch::channel(true);
        let tx = Arc::new(tx);
        let task = tokio::spawn(monitor_loop(probe, Arc::clone(&tx), check_interval));
        Self { tx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    /// A fetch failed for lack of connection; the next successful probe is a restore edge
    pub fn report_unreachable(&self) {
        let changed = set_reachable(&self.tx, false);
        if changed {
            info!("connectivity lost (reported by fetch)");
        }
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn set_reachable(tx: &watch::Sender<bool>, reachable: bool) -> bool {
    tx.send_if_modified(|current| {
        if *current == reachable {
            false
        } else {
            *current = reachable;
            true
        }
    })
}

async fn monitor_loop(
    probe: Arc<dyn ReachabilityProbe>,
    tx: Arc<watch::Sender<bool>>,
    check_interval: Duration,
) {
    let mut failures: u32 = 0;

    loop {
        let delay = if failures == 0 {
            check_interval
        } else {
            backoff_delay(check_interval, failures)
        };
        tokio::time::sleep(delay).await;

        let reachable = probe.is_reachable().await;
        if set_reachable(&tx, reachable) {
            info!(reachable, "connectivity changed");
        }

        if reachable {
            failures = 0;
        } else {
            failures = failures.saturating_add(1);
            debug!(failures, next = ?backoff_delay(check_interval, failures), "catalog unreachable");
        }
    }
}
