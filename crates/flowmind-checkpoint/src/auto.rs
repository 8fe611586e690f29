//! Periodic auto-checkpoint tick (§4.7): while the engine is `running` or
//! `waiting_human`, save a checkpoint on a fixed interval. Cancellable at
//! teardown (§5 "Cancellation and timeouts").

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use flowmind_core::WorkflowId;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::envelope::CheckpointEnvelope;
use crate::store::CheckpointStore;

/// Spawns a background tick that calls `snapshot` on `interval` and saves
/// the result to `store`, until [`AutoCheckpoint::stop`] is called or the
/// handle is dropped. `snapshot` returns `None` when the engine is not in
/// a checkpointable status.
pub struct AutoCheckpoint {
    stop: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl AutoCheckpoint {
    pub fn start<F, Fut>(
        store: Arc<dyn CheckpointStore>,
        workflow_id: WorkflowId,
        interval: Duration,
        mut snapshot: F,
    ) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Option<CheckpointEnvelope>> + Send,
    {
        let stop = Arc::new(Notify::new());
        let stop_signal = stop.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = stop_signal.notified() => break,
                    _ = ticker.tick() => {
                        if let Some(envelope) = snapshot().await {
                            if let Err(e) = store.save(workflow_id, &envelope).await {
                                warn!(%workflow_id, error = %e, "auto-checkpoint save failed");
                            }
                        }
                    }
                }
            }
        });

        Self { stop, handle }
    }

    /// Cancel the tick and wait for the background task to finish.
    pub async fn stop(self) {
        self.stop.notify_one();
        let _ = self.handle.await;
    }
}
