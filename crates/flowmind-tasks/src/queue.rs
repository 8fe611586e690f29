//! The in-memory human task priority queue (§4.5).

use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use flowmind_core::{HumanTaskId, RoleId, TokenId};
use flowmind_error::{FlowmindError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{oneshot, Mutex};

use crate::status::TaskStatus;
use crate::task::{HumanTask, NewTask};

#[derive(Default)]
struct Inner {
    tasks: HashMap<HumanTaskId, HumanTask>,
    waiters: HashMap<HumanTaskId, Vec<oneshot::Sender<HumanTask>>>,
}

/// Counts of tasks by status, keyed for JSON transport (§6 `queue/stats`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskQueueStats {
    pub total: usize,
    pub by_status: HashMap<String, usize>,
}

/// The human task priority queue. Swappable: construct your own instance
/// to inject a replacement in tests, or use [`HumanTaskQueue::shared`] for
/// the process-wide default (§4.5, §9).
#[derive(Default)]
pub struct HumanTaskQueue {
    inner: Mutex<Inner>,
}

impl HumanTaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide default instance, for CLI wiring that does not
    /// construct its own collaborators explicitly.
    pub fn shared() -> &'static HumanTaskQueue {
        static SHARED: OnceLock<HumanTaskQueue> = OnceLock::new();
        SHARED.get_or_init(HumanTaskQueue::new)
    }

    pub async fn enqueue(&self, new_task: NewTask) -> HumanTask {
        let task = HumanTask::new(new_task);
        let mut inner = self.inner.lock().await;
        inner.tasks.insert(task.id, task.clone());
        task
    }

    pub async fn get(&self, id: HumanTaskId) -> Option<HumanTask> {
        self.inner.lock().await.tasks.get(&id).cloned()
    }

    pub async fn get_by_token(&self, token_id: TokenId) -> Vec<HumanTask> {
        self.inner
            .lock()
            .await
            .tasks
            .values()
            .filter(|task| task.token_id == token_id)
            .cloned()
            .collect()
    }

    /// Pending tasks for `role_id`, ordered `(priority_rank, created_at)`
    /// ascending (§4.5, §5 ordering guarantees).
    pub async fn get_pending_by_role(&self, role_id: Option<RoleId>) -> Vec<HumanTask> {
        let mut tasks: Vec<HumanTask> = self
            .inner
            .lock()
            .await
            .tasks
            .values()
            .filter(|task| task.status == TaskStatus::Pending && task.role_id == role_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.created_at.cmp(&b.created_at)));
        tasks
    }

    pub async fn get_by_status(&self, status: TaskStatus) -> Vec<HumanTask> {
        self.inner
            .lock()
            .await
            .tasks
            .values()
            .filter(|task| task.status == status)
            .cloned()
            .collect()
    }

    /// Every task regardless of status, for the general listing endpoint
    /// (§6 `GET /api/v1/tasks`), which filters by `role_id`/`assignee` itself.
    pub async fn all(&self) -> Vec<HumanTask> {
        self.inner.lock().await.tasks.values().cloned().collect()
    }

    pub async fn assign(&self, id: HumanTaskId, user: impl Into<String>) -> Result<HumanTask> {
        let user = user.into();
        self.update(id, move |task| {
            task.assignee_id = Some(user);
            task.status = TaskStatus::Assigned;
        })
        .await
    }

    pub async fn start(&self, id: HumanTaskId) -> Result<HumanTask> {
        self.update(id, |task| task.status = TaskStatus::InProgress)
            .await
    }

    /// Complete a task with `outputs`, resolving any registered
    /// `wait_for_completion` waiter.
    pub async fn complete(&self, id: HumanTaskId, outputs: Value) -> Result<HumanTask> {
        let task = self
            .update(id, move |task| {
                task.status = TaskStatus::Completed;
                task.outputs = Some(outputs.clone());
                task.completed_at = Some(Utc::now());
            })
            .await?;
        self.resolve_waiters(id, task.clone()).await;
        Ok(task)
    }

    /// Reject a task, resolving any registered waiter with the rejected
    /// task (the human actor surfaces this as `rejected-by-human`).
    pub async fn reject(&self, id: HumanTaskId, reason: impl Into<String>) -> Result<HumanTask> {
        let reason = reason.into();
        let task = self
            .update(id, move |task| {
                task.status = TaskStatus::Rejected;
                task.outputs = Some(serde_json::json!({ "reason": reason }));
                task.completed_at = Some(Utc::now());
            })
            .await?;
        self.resolve_waiters(id, task.clone()).await;
        Ok(task)
    }

    /// Resolve immediately if `id` is already terminal; otherwise await its
    /// completion (§4.5).
    pub async fn wait_for_completion(&self, id: HumanTaskId) -> Result<HumanTask> {
        let receiver = {
            let mut inner = self.inner.lock().await;
            let task = inner
                .tasks
                .get(&id)
                .ok_or_else(|| FlowmindError::not_found("human task", id))?;
            if task.status.is_terminal() {
                return Ok(task.clone());
            }
            let (tx, rx) = oneshot::channel();
            inner.waiters.entry(id).or_default().push(tx);
            rx
        };
        receiver
            .await
            .map_err(|_| FlowmindError::cancelled("human task waiter was dropped before resolution"))
    }

    pub async fn clear_completed(&self) {
        let mut inner = self.inner.lock().await;
        inner.tasks.retain(|_, task| !task.status.is_terminal());
    }

    pub async fn stats(&self) -> TaskQueueStats {
        let inner = self.inner.lock().await;
        let mut by_status = HashMap::new();
        for task in inner.tasks.values() {
            *by_status.entry(format!("{:?}", task.status).to_lowercase()).or_insert(0) += 1;
        }
        TaskQueueStats {
            total: inner.tasks.len(),
            by_status,
        }
    }

    /// Bump a task's priority one tier, idempotently (§11 supplemented
    /// feature: SLA escalation).
    pub async fn escalate(&self, id: HumanTaskId) -> Result<HumanTask> {
        self.update(id, |task| {
            if !task.escalated {
                task.priority = task.priority.escalate();
                task.escalated = true;
            }
        })
        .await
    }

    /// Escalate every non-terminal, not-yet-escalated task whose `due_at`
    /// has passed as of `now`. Returns the ids touched.
    pub async fn sweep_overdue(&self, now: DateTime<Utc>) -> Vec<HumanTaskId> {
        let overdue: Vec<HumanTaskId> = {
            let inner = self.inner.lock().await;
            inner
                .tasks
                .values()
                .filter(|task| {
                    !task.status.is_terminal() && !task.escalated && task.due_at.is_some_and(|due| due <= now)
                })
                .map(|task| task.id)
                .collect()
        };
        for id in &overdue {
            let _ = self.escalate(*id).await;
        }
        overdue
    }

    async fn update(&self, id: HumanTaskId, f: impl FnOnce(&mut HumanTask)) -> Result<HumanTask> {
        let mut inner = self.inner.lock().await;
        let task = inner
            .tasks
            .get_mut(&id)
            .ok_or_else(|| FlowmindError::not_found("human task", id))?;
        f(task);
        task.updated_at = Utc::now();
        Ok(task.clone())
    }

    async fn resolve_waiters(&self, id: HumanTaskId, task: HumanTask) {
        let waiters = {
            let mut inner = self.inner.lock().await;
            inner.waiters.remove(&id).unwrap_or_default()
        };
        for tx in waiters {
            let _ = tx.send(task.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use flowmind_core::{ActivityId, TokenId};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::priority::Priority;

    fn new_task(priority: Priority) -> NewTask {
        NewTask {
            activity_id: ActivityId::v4(),
            token_id: TokenId::v4(),
            role_id: None,
            priority,
            inputs: serde_json::json!({}),
            due_at: None,
        }
    }

    #[tokio::test]
    async fn enqueue_then_get_roundtrips() {
        let queue = HumanTaskQueue::new();
        let task = queue.enqueue(new_task(Priority::Normal)).await;
        let fetched = queue.get(task.id).await.unwrap();
        assert_eq!(fetched.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn pending_by_role_orders_by_priority_then_created_at() {
        let queue = HumanTaskQueue::new();
        let low = queue.enqueue(new_task(Priority::Low)).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        let critical = queue.enqueue(new_task(Priority::Critical)).await;
        tokio::time::sleep(Duration::from_millis(1)).await;
        let normal = queue.enqueue(new_task(Priority::Normal)).await;

        let ordered = queue.get_pending_by_role(None).await;
        let ids: Vec<_> = ordered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![critical.id, normal.id, low.id]);
    }

    #[tokio::test]
    async fn complete_resolves_waiter() {
        let queue = HumanTaskQueue::new();
        let task = queue.enqueue(new_task(Priority::Normal)).await;

        let wait = queue.wait_for_completion(task.id);
        let complete = queue.complete(task.id, serde_json::json!({"approved": true}));
        let (waited, _) = tokio::join!(wait, complete);

        let resolved = waited.unwrap();
        assert_eq!(resolved.status, TaskStatus::Completed);
        assert_eq!(resolved.outputs, Some(serde_json::json!({"approved": true})));
    }

    #[tokio::test]
    async fn wait_for_completion_resolves_immediately_if_already_terminal() {
        let queue = HumanTaskQueue::new();
        let task = queue.enqueue(new_task(Priority::Normal)).await;
        queue.reject(task.id, "not applicable").await.unwrap();

        let resolved = queue.wait_for_completion(task.id).await.unwrap();
        assert_eq!(resolved.status, TaskStatus::Rejected);
    }

    #[tokio::test]
    async fn reject_stores_reason_in_outputs() {
        let queue = HumanTaskQueue::new();
        let task = queue.enqueue(new_task(Priority::Normal)).await;
        let rejected = queue.reject(task.id, "budget exceeded").await.unwrap();
        assert_eq!(
            rejected.outputs,
            Some(serde_json::json!({"reason": "budget exceeded"}))
        );
    }

    #[tokio::test]
    async fn clear_completed_removes_only_terminal_tasks() {
        let queue = HumanTaskQueue::new();
        let pending = queue.enqueue(new_task(Priority::Normal)).await;
        let completed = queue.enqueue(new_task(Priority::Normal)).await;
        queue.complete(completed.id, serde_json::json!({})).await.unwrap();

        queue.clear_completed().await;

        assert!(queue.get(pending.id).await.is_some());
        assert!(queue.get(completed.id).await.is_none());
    }

    #[tokio::test]
    async fn sweep_overdue_escalates_exactly_once() {
        let queue = HumanTaskQueue::new();
        let mut task = new_task(Priority::Normal);
        task.due_at = Some(Utc::now() - chrono::Duration::seconds(1));
        let task = queue.enqueue(task).await;

        let touched = queue.sweep_overdue(Utc::now()).await;
        assert_eq!(touched, vec![task.id]);
        assert_eq!(queue.get(task.id).await.unwrap().priority, Priority::High);

        let touched_again = queue.sweep_overdue(Utc::now()).await;
        assert!(touched_again.is_empty());
    }

    #[tokio::test]
    async fn all_returns_tasks_of_every_status() {
        let queue = HumanTaskQueue::new();
        let pending = queue.enqueue(new_task(Priority::Normal)).await;
        let completed = queue.enqueue(new_task(Priority::Normal)).await;
        queue.complete(completed.id, serde_json::json!({})).await.unwrap();

        let all = queue.all().await;
        let ids: std::collections::HashSet<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, [pending.id, completed.id].into_iter().collect());
    }

    #[tokio::test]
    async fn stats_counts_by_status() {
        let queue = HumanTaskQueue::new();
        queue.enqueue(new_task(Priority::Normal)).await;
        let stats = queue.stats().await;
        assert_eq!(stats.total, 1);
        assert_eq!(stats.by_status.get("pending"), Some(&1));
    }
}
