//! Human task status (§3 "Human task").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Rejected,
    Expired,
}

impl TaskStatus {
    /// Terminal statuses resolve any `wait_for_completion` waiter and drop
    /// the task from the "pending" view (§3).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Expired)
    }
}
