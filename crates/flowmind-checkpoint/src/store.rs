//! The abstract checkpoint store (§4.7): `save`, `load`, `delete`, `list`.

use async_trait::async_trait;
use flowmind_core::WorkflowId;
use flowmind_error::Result;

use crate::envelope::CheckpointEnvelope;

/// A place checkpoints can be persisted and retrieved, keyed by workflow id
/// — each `save` for a given workflow overwrites its prior checkpoint.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    async fn save(&self, workflow_id: WorkflowId, envelope: &CheckpointEnvelope) -> Result<()>;
    async fn load(&self, workflow_id: WorkflowId) -> Result<Option<CheckpointEnvelope>>;
    async fn delete(&self, workflow_id: WorkflowId) -> Result<()>;
    async fn list(&self) -> Result<Vec<WorkflowId>>;
}
