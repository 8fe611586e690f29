//! Human task priority (§4.5).

use serde::{Deserialize, Serialize};

/// Task priority. Declaration order is rank order: `critical < high < normal
/// < low` (§4.5), so the derived [`Ord`] impl is the queue's comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Normal,
    Low,
}

impl Priority {
    /// Bump to the next-more-urgent tier, saturating at `critical`. Used by
    /// SLA escalation sweeps.
    #[must_use]
    pub fn escalate(self) -> Self {
        match self {
            Self::Critical => Self::Critical,
            Self::High => Self::Critical,
            Self::Normal => Self::High,
            Self::Low => Self::Normal,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Normal
    }
}
