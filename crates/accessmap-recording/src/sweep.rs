//! Background idle-expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::registry::SessionRegistry;

/// Handle to a running expiry sweep
pub struct SweepHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Stop the sweep and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Expiry sweep task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn a task that calls [`SessionRegistry::sweep_expired`] every `period`
///
/// Must be called from within a tokio runtime.
pub fn spawn_expiry_sweep(registry: Arc<SessionRegistry>, period: Duration) -> SweepHandle {
    let (tx, mut rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            period_secs = period.as_secs_f64(),
            idle_timeout_secs = registry.idle_timeout().num_seconds(),
            "Expiry sweep started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let expired = registry.sweep_expired();
                    if !expired.is_empty() {
                        tracing::info!(count = expired.len(), "Expired idle recordings");
                    }
                }
                _ = &mut rx => {
                    tracing::info!("Expiry sweep stopping");
                    break;
                }
            }
        }
    });

    SweepHandle { shutdown: Some(tx), task }
}
