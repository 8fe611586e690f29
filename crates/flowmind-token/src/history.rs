//! Token history: the append-only event log (§3 "Token", §4.1 analytics).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::TokenStatus;

/// A history entry's action tag. `StatusChange` serializes as the literal
/// `"status_change:<new>"` string per the wire format (§3), not as a
/// structured variant, so it gets hand-written (de)serialization instead of
/// `#[serde(tag = ...)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Created,
    Entered,
    Exited,
    StatusChange(TokenStatus),
    /// The activity's actor reported `{"_flow": "skip", ...}` (§11 supplemented
    /// flow control): the node was visited but its program opted out of
    /// running, and the token still advances normally afterward.
    Skip,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Entered => f.write_str("entered"),
            Self::Exited => f.write_str("exited"),
            Self::StatusChange(status) => write!(f, "status_change:{status}"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "entered" => Ok(Self::Entered),
            "exited" => Ok(Self::Exited),
            "skip" => Ok(Self::Skip),
            other => other
                .strip_prefix("status_change:")
                .ok_or_else(|| format!("unrecognized history action {other:?}"))
                .and_then(|status| status.parse().map_err(|e: String| e))
                .map(Self::StatusChange),
        }
    }
}

impl Serialize for Action {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the eight lean-manufacturing waste categories (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WasteCategory {
    Defects,
    Overproduction,
    Waiting,
    NonUtilizedTalent,
    Transport,
    Inventory,
    Motion,
    ExtraProcessing,
}

/// Optional analytics payload carried on a history entry (§4.1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analytics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_added: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waste_categories: Vec<WasteCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
}

/// One append-only entry in a token's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub node_id: Option<String>,
    pub action: Action,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
}
