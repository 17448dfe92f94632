//! Expiry Sweeper Task
//!
//! Single background task that reclaims entries nobody reads after their
//! deadline. Deadlines arrive over a channel and wait in a min-heap; the task
//! sleeps until the earliest one (plus a grace period) and then asks the store
//! to drop that key if, and only if, the entry stored there has expired.
//!
//! Reads never depend on this task. It only frees memory.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::WeakStore;

/// A key to revisit once `due` has passed.
///
/// Ordered by `due` first so the heap yields the earliest deadline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduledSweep {
    pub due: DateTime<Utc>,
    pub key: String,
}

/// Spawns the sweeper for `store`.
///
/// Each received sweep fires no earlier than `due + grace`. The task exits
/// when the store's sender side is dropped or the store itself is gone.
pub(crate) fn spawn_expiry_sweeper<V>(
    store: WeakStore<V>,
    mut requests: UnboundedReceiver<ScheduledSweep>,
    grace: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    let grace_delta = grace_delta(grace);

    tokio::spawn(async move {
        debug!(?grace, "Expiry sweeper started");
        let mut pending: BinaryHeap<Reverse<ScheduledSweep>> = BinaryHeap::new();

        loop {
            let next_due = pending.peek().map(|Reverse(sweep)| sweep.due);

            tokio::select! {
                request = requests.recv() => match request {
                    Some(mut sweep) => {
                        sweep.due = fire_at(sweep.due, grace_delta);
                        pending.push(Reverse(sweep));
                    }
                    None => break,
                },
                _ = sleep_until(next_due) => {
                    let Some(store) = store.upgrade() else { break };
                    let now = Utc::now();
                    let mut removed = 0usize;

                    while pending.peek().is_some_and(|Reverse(sweep)| sweep.due <= now) {
                        if let Some(Reverse(sweep)) = pending.pop() {
                            if store.sweep(&sweep.key) {
                                removed += 1;
                            }
                        }
                    }

                    if removed > 0 {
                        debug!(removed, pending = pending.len(), "Expiry sweep removed entries");
                    }
                }
            }
        }

        debug!(abandoned = pending.len(), "Expiry sweeper stopped");
    })
}

/// Converts the grace period, clamping anything chrono cannot represent.
fn grace_delta(grace: Duration) -> chrono::Duration {
    chrono::Duration::from_std(grace).unwrap_or_else(|_| {
        warn!(?grace, "Sweep grace period out of range, clamping to maximum");
        chrono::Duration::MAX
    })
}

/// When a sweep for `deadline` may fire; saturates instead of wrapping back to the deadline.
fn fire_at(deadline: DateTime<Utc>, grace: chrono::Duration) -> DateTime<Utc> {
    deadline
        .checked_add_signed(grace)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sleeps until `due`, or forever when nothing is scheduled.
async fn sleep_until(due: Option<DateTime<Utc>>) {
    match due {
        Some(due) => {
            let wait = (due - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;
        }
        None => std::future::pending::<()>().await,
    }
}
