//! The [`HumanTask`] record (§3 "Human task").

use chrono::{DateTime, Utc};
use flowmind_core::{ActivityId, HumanTaskId, RoleId, TokenId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::priority::Priority;
use crate::status::TaskStatus;

/// Parameters for [`crate::queue::HumanTaskQueue::enqueue`].
pub struct NewTask {
    pub activity_id: ActivityId,
    pub token_id: TokenId,
    pub role_id: Option<RoleId>,
    pub priority: Priority,
    pub inputs: Value,
    pub due_at: Option<DateTime<Utc>>,
}

/// A materialized side-effect produced by a human actor call (§3, §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanTask {
    pub id: HumanTaskId,
    pub activity_id: ActivityId,
    pub token_id: TokenId,
    pub role_id: Option<RoleId>,
    pub priority: Priority,
    pub status: TaskStatus,
    pub assignee_id: Option<String>,
    pub inputs: Value,
    pub outputs: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Whether an SLA sweep has already bumped this task's priority (§11
    /// supplemented feature). Not part of the wire-format task shape;
    /// kept to make repeated sweeps idempotent.
    #[serde(default)]
    pub escalated: bool,
}

impl HumanTask {
    pub(crate) fn new(new_task: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: HumanTaskId::v4(),
            activity_id: new_task.activity_id,
            token_id: new_task.token_id,
            role_id: new_task.role_id,
            priority: new_task.priority,
            status: TaskStatus::Pending,
            assignee_id: None,
            inputs: new_task.inputs,
            outputs: None,
            created_at: now,
            updated_at: now,
            due_at: new_task.due_at,
            completed_at: None,
            escalated: false,
        }
    }
}
