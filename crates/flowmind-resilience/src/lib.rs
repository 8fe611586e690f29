//! # Flowmind Resilience
//!
//! The retry backoff wrapper and dead-letter quarantine that back the
//! engine's failure-handling pipeline (§4.6).

pub mod dead_letter;
pub mod retry;

pub use dead_letter::{DeadLetterEntry, DeadLetterError, DeadLetterQueue, DeadLetterStats};
pub use retry::{is_retryable, with_retry, RetryConfig, RetryState};
