//! # Flowmind Tasks
//!
//! The in-memory human task priority queue (§3 "Human task", §4.5) plus the
//! SLA escalation sweep (§11 supplemented feature).

pub mod priority;
pub mod queue;
pub mod status;
pub mod task;

pub use priority::Priority;
pub use queue::{HumanTaskQueue, TaskQueueStats};
pub use status::TaskStatus;
pub use task::{HumanTask, NewTask};
