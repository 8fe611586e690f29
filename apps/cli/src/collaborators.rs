//! Process-wide default collaborators (§9 REDESIGN FLAGS, §10.5).
//!
//! The kernel's [`flowmind_engine::Engine`] always takes its task queue,
//! dead-letter queue, and checkpoint store as explicit constructor
//! arguments — it never assumes a singleton. This binary is the one place
//! that convenience matters: one [`DefaultCollaborators`] is built at
//! startup and shared by every engine run the CLI or HTTP server drives, so
//! the HTTP task endpoints (`/api/v1/tasks*`) see the same queue the
//! `/api/v1/workflows/run` handler enqueues into.

use std::path::PathBuf;
use std::sync::Arc;

use flowmind_checkpoint::{CheckpointStore, FileCheckpointStore};
use flowmind_resilience::DeadLetterQueue;
use flowmind_tasks::HumanTaskQueue;

pub struct DefaultCollaborators {
    pub task_queue: Arc<HumanTaskQueue>,
    pub dead_letter: Arc<DeadLetterQueue>,
    pub checkpoint_store: Arc<dyn CheckpointStore>,
}

impl DefaultCollaborators {
    #[must_use]
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> Self {
        Self {
            task_queue: Arc::new(HumanTaskQueue::new()),
            dead_letter: Arc::new(DeadLetterQueue::new()),
            checkpoint_store: Arc::new(FileCheckpointStore::new(checkpoint_dir.into())),
        }
    }
}

/// `<data dir>/flowmind/checkpoints`, falling back to `./flowmind-checkpoints`
/// when the platform has no data directory (e.g. a minimal container).
#[must_use]
pub fn default_checkpoint_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("flowmind").join("checkpoints"))
        .unwrap_or_else(|| PathBuf::from("flowmind-checkpoints"))
}
