//! The Dead-Letter Queue: a keyed store of terminally failed tokens with a
//! per-workflow index (§4.6, §3 "Dead-letter entry").

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use flowmind_core::{ActivityId, TokenId, WorkflowId};
use flowmind_token::Token;
use serde::{Deserialize, Serialize};

use crate::retry::RetryState;

/// A snapshot of a token's declared error at the point it was quarantined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterError {
    pub message: String,
    pub kind: String,
    pub stack: Option<String>,
}

/// One quarantined token (§3 "Dead-letter entry").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterEntry {
    pub token: Token,
    pub workflow_id: WorkflowId,
    pub activity_id: Option<ActivityId>,
    pub error: DeadLetterError,
    pub retry_state: RetryState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Counts by workflow, for `{total, by_workflow}` stats (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadLetterStats {
    pub total: usize,
    pub by_workflow: HashMap<WorkflowId, usize>,
}

/// In-memory keyed store of dead-lettered tokens, indexed by [`TokenId`]
/// with a secondary per-workflow index for `list_by_workflow` (§4.6).
#[derive(Default)]
pub struct DeadLetterQueue {
    inner: Mutex<HashMap<TokenId, DeadLetterEntry>>,
}

impl DeadLetterQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&self, entry: DeadLetterEntry) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(entry.token.id, entry);
    }

    #[must_use]
    pub fn list(&self) -> Vec<DeadLetterEntry> {
        self.inner.lock().unwrap().values().cloned().collect()
    }

    #[must_use]
    pub fn list_by_workflow(&self, workflow_id: WorkflowId) -> Vec<DeadLetterEntry> {
        self.inner
            .lock()
            .unwrap()
            .values()
            .filter(|entry| entry.workflow_id == workflow_id)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn remove(&self, token_id: TokenId) -> Option<DeadLetterEntry> {
        self.inner.lock().unwrap().remove(&token_id)
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    #[must_use]
    pub fn stats(&self) -> DeadLetterStats {
        let inner = self.inner.lock().unwrap();
        let mut by_workflow: HashMap<WorkflowId, usize> = HashMap::new();
        for entry in inner.values() {
            *by_workflow.entry(entry.workflow_id).or_insert(0) += 1;
        }
        DeadLetterStats {
            total: inner.len(),
            by_workflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(workflow_id: WorkflowId) -> DeadLetterEntry {
        DeadLetterEntry {
            token: Token::new("activity-1".to_string(), HashMap::new(), workflow_id),
            workflow_id,
            activity_id: None,
            error: DeadLetterError {
                message: "actor unreachable".to_string(),
                kind: "integration-error".to_string(),
                stack: None,
            },
            retry_state: RetryState {
                attempt: 3,
                started_at: Some(Utc::now()),
                last_error: Some("actor unreachable".to_string()),
            },
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn enqueue_then_list_roundtrips() {
        let dlq = DeadLetterQueue::new();
        let workflow_id = WorkflowId::v4();
        dlq.enqueue(entry(workflow_id));
        assert_eq!(dlq.list().len(), 1);
    }

    #[test]
    fn list_by_workflow_filters() {
        let dlq = DeadLetterQueue::new();
        let workflow_a = WorkflowId::v4();
        let workflow_b = WorkflowId::v4();
        dlq.enqueue(entry(workflow_a));
        dlq.enqueue(entry(workflow_b));

        assert_eq!(dlq.list_by_workflow(workflow_a).len(), 1);
        assert_eq!(dlq.list_by_workflow(workflow_b).len(), 1);
    }

    #[test]
    fn remove_drops_the_entry() {
        let dlq = DeadLetterQueue::new();
        let workflow_id = WorkflowId::v4();
        let e = entry(workflow_id);
        let token_id = e.token.id;
        dlq.enqueue(e);

        assert!(dlq.remove(token_id).is_some());
        assert!(dlq.list().is_empty());
    }

    #[test]
    fn stats_counts_by_workflow() {
        let dlq = DeadLetterQueue::new();
        let workflow_id = WorkflowId::v4();
        dlq.enqueue(entry(workflow_id));
        dlq.enqueue(entry(workflow_id));

        let stats = dlq.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_workflow.get(&workflow_id), Some(&2));
    }

    #[test]
    fn clear_empties_the_queue() {
        let dlq = DeadLetterQueue::new();
        dlq.enqueue(entry(WorkflowId::v4()));
        dlq.clear();
        assert!(dlq.list().is_empty());
    }
}
