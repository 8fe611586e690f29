//! The file-per-workflow reference [`CheckpointStore`] (§4.7, §6 persisted
//! state layout: one file per workflow id, `<workflow_id>.state.json`).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flowmind_core::WorkflowId;
use flowmind_error::{ErrorContext, FlowmindError, Result};

use crate::envelope::CheckpointEnvelope;
use crate::store::CheckpointStore;

pub struct FileCheckpointStore {
    directory: PathBuf,
}

impl FileCheckpointStore {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, workflow_id: WorkflowId) -> PathBuf {
        self.directory.join(format!("{workflow_id}.state.json"))
    }

    async fn ensure_directory(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| FlowmindError::integration(format!("failed to create checkpoint directory: {e}")))
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn save(&self, workflow_id: WorkflowId, envelope: &CheckpointEnvelope) -> Result<()> {
        self.ensure_directory().await?;
        let json = serde_json::to_vec_pretty(envelope)
            .map_err(|e| FlowmindError::validation(format!("failed to serialize checkpoint: {e}")))?;
        tokio::fs::write(self.path_for(workflow_id), json)
            .await
            .map_err(|e| FlowmindError::integration(format!("failed to write checkpoint file: {e}")))
            .context(format!("saving checkpoint for workflow {workflow_id}"))
    }

    async fn load(&self, workflow_id: WorkflowId) -> Result<Option<CheckpointEnvelope>> {
        match tokio::fs::read(self.path_for(workflow_id)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| FlowmindError::validation(format!("failed to parse checkpoint file: {e}"))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FlowmindError::integration(format!("failed to read checkpoint file: {e}"))),
        }
    }

    async fn delete(&self, workflow_id: WorkflowId) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(workflow_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlowmindError::integration(format!("failed to delete checkpoint file: {e}"))),
        }
    }

    async fn list(&self) -> Result<Vec<WorkflowId>> {
        if !Path::new(&self.directory).exists() {
            return Ok(Vec::new());
        }
        let mut entries = tokio::fs::read_dir(&self.directory)
            .await
            .map_err(|e| FlowmindError::integration(format!("failed to list checkpoint directory: {e}")))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FlowmindError::integration(format!("failed to read checkpoint directory entry: {e}")))?
        {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(id_str) = file_name.strip_suffix(".state.json") {
                if let Ok(id) = id_str.parse() {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path());
        let workflow_id = WorkflowId::v4();
        let envelope = CheckpointEnvelope::new(workflow_id, "wf", "1.0.0", "running", Vec::new(), HashMap::new());

        store.save(workflow_id, &envelope).await.unwrap();
        let loaded = store.load(workflow_id).await.unwrap().unwrap();
        assert_eq!(loaded.workflow_id, workflow_id);
        assert!(dir.path().join(format!("{workflow_id}.state.json")).exists());
    }

    #[tokio::test]
    async fn load_of_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path());
        assert!(store.load(WorkflowId::v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path());
        let workflow_id = WorkflowId::v4();
        let envelope = CheckpointEnvelope::new(workflow_id, "wf", "1.0.0", "running", Vec::new(), HashMap::new());
        store.save(workflow_id, &envelope).await.unwrap();

        store.delete(workflow_id).await.unwrap();
        assert!(store.load(workflow_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_discovers_saved_workflows() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path());
        let workflow_id = WorkflowId::v4();
        let envelope = CheckpointEnvelope::new(workflow_id, "wf", "1.0.0", "running", Vec::new(), HashMap::new());
        store.save(workflow_id, &envelope).await.unwrap();

        let ids = store.list().await.unwrap();
        assert_eq!(ids, vec![workflow_id]);
    }

    #[tokio::test]
    async fn list_of_nonexistent_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let store = FileCheckpointStore::new(missing);
        assert!(store.list().await.unwrap().is_empty());
    }
}
