//! The in-memory reference [`CheckpointStore`] (§4.7).

use std::collections::HashMap;

use async_trait::async_trait;
use flowmind_core::WorkflowId;
use flowmind_error::Result;
use tokio::sync::Mutex;

use crate::envelope::CheckpointEnvelope;
use crate::store::CheckpointStore;

#[derive(Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Mutex<HashMap<WorkflowId, CheckpointEnvelope>>,
}

impl InMemoryCheckpointStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(&self, workflow_id: WorkflowId, envelope: &CheckpointEnvelope) -> Result<()> {
        self.checkpoints.lock().await.insert(workflow_id, envelope.clone());
        Ok(())
    }

    async fn load(&self, workflow_id: WorkflowId) -> Result<Option<CheckpointEnvelope>> {
        Ok(self.checkpoints.lock().await.get(&workflow_id).cloned())
    }

    async fn delete(&self, workflow_id: WorkflowId) -> Result<()> {
        self.checkpoints.lock().await.remove(&workflow_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<WorkflowId>> {
        Ok(self.checkpoints.lock().await.keys().copied().collect())
    }
}
