//! Engine-level status machine (§4.8): `idle -> running -> {waiting_human
//! <-> running} -> completed | failed | paused`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Idle,
    Running,
    WaitingHuman,
    Completed,
    Failed,
    Paused,
}

impl EngineStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::WaitingHuman => "waiting_human",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Paused => "paused",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EngineStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "waiting_human" => Ok(Self::WaitingHuman),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "paused" => Ok(Self::Paused),
            other => Err(format!("unknown engine status {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(EngineStatus::Completed.is_terminal());
        assert!(EngineStatus::Failed.is_terminal());
        assert!(!EngineStatus::Running.is_terminal());
        assert!(!EngineStatus::WaitingHuman.is_terminal());
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for status in [
            EngineStatus::Idle,
            EngineStatus::Running,
            EngineStatus::WaitingHuman,
            EngineStatus::Completed,
            EngineStatus::Failed,
            EngineStatus::Paused,
        ] {
            let parsed: EngineStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
