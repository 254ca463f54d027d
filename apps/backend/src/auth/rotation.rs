//! Background rotation of the signing secret.
//!
//! One tokio task ticks every `interval` and rotates the secret store. The
//! first rotation happens one full interval after start. Missed ticks are
//! skipped rather than replayed, so a suspended process rotates at most once
//! when it resumes. A failed rotation is logged and the next tick proceeds
//! as usual.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::auth::secret_store::SecretStore;

/// `interval_at` panics on a zero period.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct RotationScheduler {
    store: Arc<SecretStore>,
    interval: Duration,
}

impl RotationScheduler {
    pub fn new(store: Arc<SecretStore>, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// One rotation attempt. Failures are logged, never propagated.
    pub fn run_once(&self) {
        if let Err(e) = self.store.rotate() {
            error!(
                error = %e,
                generation = self.store.generation(),
                "signing secret rotation failed; keeping current secret"
            );
        }
    }

    /// Start the scheduler on the current tokio runtime.
    pub fn spawn(self) -> RotationHandle {
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        info!(
            interval_secs = self.interval.as_secs(),
            "starting signing secret rotation scheduler"
        );

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => self.run_once(),
                }
            }

            info!("signing secret rotation scheduler stopped");
        });

        RotationHandle { cancel, task }
    }
}

pub struct RotationHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RotationHandle {
    /// Stop the scheduler and wait for the task to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!(error = %e, "rotation scheduler task ended abnormally");
        }
    }
}
