//! The [`Token`] type and its operations (§4.1).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use flowmind_core::{TokenId, WorkflowId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::history::{Action, Analytics, HistoryEntry};
use crate::status::TokenStatus;

/// A unit of execution moving through a workflow graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub workflow_id: WorkflowId,
    pub current_node_id: String,
    pub status: TokenStatus,
    pub context_data: HashMap<String, Value>,
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Token {
    /// Create a new token at `node_id`, seeded with `initial_data`. Appends
    /// the sole `created` history entry and sets status to `active`.
    #[must_use]
    pub fn new(
        node_id: impl Into<String>,
        initial_data: HashMap<String, Value>,
        workflow_id: WorkflowId,
    ) -> Self {
        let now = Utc::now();
        let node_id = node_id.into();
        Self {
            id: TokenId::v4(),
            workflow_id,
            current_node_id: node_id.clone(),
            status: TokenStatus::Active,
            context_data: initial_data,
            history: vec![HistoryEntry {
                node_id: Some(node_id),
                action: Action::Created,
                timestamp: now,
                analytics: None,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to `next_node_id`: append `exited` for the current node (with
    /// `exit_analytics`, if any), then `entered` for the next.
    pub fn move_to(&mut self, next_node_id: impl Into<String>, exit_analytics: Option<Analytics>) {
        let now = Utc::now();
        self.history.push(HistoryEntry {
            node_id: Some(self.current_node_id.clone()),
            action: Action::Exited,
            timestamp: now,
            analytics: exit_analytics,
        });
        self.current_node_id = next_node_id.into();
        self.history.push(HistoryEntry {
            node_id: Some(self.current_node_id.clone()),
            action: Action::Entered,
            timestamp: now,
            analytics: None,
        });
        self.updated_at = now;
    }

    /// Complete at the current node: append `exited` (carrying
    /// `exit_analytics`) then transition to `completed` (§4.8 "Edge
    /// selection" — the terminal case, when a node has no outgoing edges).
    pub fn complete_here(&mut self, exit_analytics: Option<Analytics>) {
        let now = Utc::now();
        self.history.push(HistoryEntry {
            node_id: Some(self.current_node_id.clone()),
            action: Action::Exited,
            timestamp: now,
            analytics: exit_analytics,
        });
        self.updated_at = now;
        self.update_status(TokenStatus::Completed, None);
    }

    /// Record that the current node's actor reported `{"_flow": "skip"}`
    /// (§11 supplemented flow control): append a `skip` entry without
    /// changing `status` or `current_node_id`. The caller still advances the
    /// token afterward, the same as a normally-executed activity.
    pub fn skip_here(&mut self, analytics: Option<Analytics>) {
        let now = Utc::now();
        self.history.push(HistoryEntry {
            node_id: Some(self.current_node_id.clone()),
            action: Action::Skip,
            timestamp: now,
            analytics,
        });
        self.updated_at = now;
    }

    /// Transition to `new_status`, appending a `status_change:<new_status>`
    /// entry. No-op (fails silently) if the token is already terminal (§4.1).
    pub fn update_status(&mut self, new_status: TokenStatus, analytics: Option<Analytics>) {
        if self.status.is_terminal() {
            return;
        }
        let now = Utc::now();
        self.status = new_status;
        self.history.push(HistoryEntry {
            node_id: Some(self.current_node_id.clone()),
            action: Action::StatusChange(new_status),
            timestamp: now,
            analytics,
        });
        self.updated_at = now;
    }

    /// Shallow top-level merge of `data` into `context_data` (last-write-wins).
    pub fn merge_data(&mut self, data: HashMap<String, Value>) {
        self.context_data.extend(data);
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.context_data.get(key)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: Value) {
        self.context_data.insert(key.into(), value);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn new_token() -> Token {
        Token::new("A", HashMap::new(), WorkflowId::v4())
    }

    #[test]
    fn new_token_has_single_created_entry_and_is_active() {
        let token = new_token();
        assert_eq!(token.status, TokenStatus::Active);
        assert_eq!(token.history.len(), 1);
        assert_eq!(token.history[0].action, Action::Created);
    }

    #[test]
    fn move_to_appends_matched_exited_and_entered_pair() {
        let mut token = new_token();
        token.move_to("B", None);
        assert_eq!(token.current_node_id, "B");
        assert_eq!(token.history.len(), 3);
        assert_eq!(token.history[1].action, Action::Exited);
        assert_eq!(token.history[1].node_id.as_deref(), Some("A"));
        assert_eq!(token.history[2].action, Action::Entered);
        assert_eq!(token.history[2].node_id.as_deref(), Some("B"));
    }

    #[test]
    fn complete_here_appends_exited_then_status_change() {
        let mut token = new_token();
        token.complete_here(None);
        assert_eq!(token.status, TokenStatus::Completed);
        assert_eq!(token.history.len(), 3);
        assert_eq!(token.history[1].action, Action::Exited);
        assert_eq!(token.history[1].node_id.as_deref(), Some("A"));
        assert_eq!(
            token.history[2].action,
            Action::StatusChange(TokenStatus::Completed)
        );
    }

    #[test]
    fn update_status_appends_status_change_entry() {
        let mut token = new_token();
        token.update_status(TokenStatus::Completed, None);
        assert_eq!(token.status, TokenStatus::Completed);
        assert_eq!(
            token.history.last().unwrap().action,
            Action::StatusChange(TokenStatus::Completed)
        );
    }

    #[rstest]
    #[case(TokenStatus::Completed)]
    #[case(TokenStatus::Failed)]
    #[case(TokenStatus::Cancelled)]
    fn update_status_is_a_no_op_once_terminal(#[case] terminal: TokenStatus) {
        let mut token = new_token();
        token.update_status(terminal, None);
        let history_len = token.history.len();
        token.update_status(TokenStatus::Active, None);
        assert_eq!(token.status, terminal);
        assert_eq!(token.history.len(), history_len);
    }

    #[test]
    fn skip_here_appends_skip_entry_without_changing_status_or_node() {
        let mut token = new_token();
        token.skip_here(None);
        assert_eq!(token.status, TokenStatus::Active);
        assert_eq!(token.current_node_id, "A");
        assert_eq!(token.history.last().unwrap().action, Action::Skip);
    }

    #[test]
    fn merge_data_is_shallow_and_last_write_wins() {
        let mut token = new_token();
        token.set_data("a", serde_json::json!(1));
        token.merge_data(HashMap::from([
            ("a".to_string(), serde_json::json!(2)),
            ("b".to_string(), serde_json::json!({ "nested": true })),
        ]));
        assert_eq!(token.get_data("a"), Some(&serde_json::json!(2)));
        assert_eq!(
            token.get_data("b"),
            Some(&serde_json::json!({ "nested": true }))
        );
    }

    #[test]
    fn get_and_set_data_round_trip() {
        let mut token = new_token();
        assert_eq!(token.get_data("missing"), None);
        token.set_data("x", serde_json::json!("hello"));
        assert_eq!(token.get_data("x"), Some(&serde_json::json!("hello")));
    }
}
