//! # Flowmind Core
//!
//! Foundational types shared by every Flowmind crate: strongly-typed
//! identifiers, ISO-8601 duration utilities, and a monotonic clock wrapper.

pub mod clock;
pub mod duration;
pub mod id;

pub use clock::Stopwatch;
pub use duration::{format_iso8601_seconds, parse_iso8601};
pub use id::{
    ActivityId, CheckpointId, ContextId, DeadLetterId, EdgeId, HumanTaskId, RoleId, TokenId,
    UuidParseError, WorkflowId,
};

/// Common prelude for downstream Flowmind crates.
pub mod prelude {
    pub use crate::{
        ActivityId, CheckpointId, ContextId, DeadLetterId, EdgeId, HumanTaskId, RoleId, Stopwatch,
        TokenId, WorkflowId, format_iso8601_seconds, parse_iso8601,
    };
}
