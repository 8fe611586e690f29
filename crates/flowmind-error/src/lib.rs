//! # Flowmind Error
//!
//! Centralized error handling for the Flowmind workflow engine. A single
//! [`FlowmindError`] wraps a [`FlowmindErrorKind`] enum whose variants are
//! the error kinds named by the kernel's propagation policy: validation,
//! not-found, config, integration, rejected-by-human, no-matching-rule,
//! not-implemented, and cancelled.
//!
//! ```rust
//! use flowmind_error::FlowmindError;
//!
//! let err = FlowmindError::validation("dangling edge endpoint");
//! assert!(!err.is_retryable());
//! ```

use std::fmt;

/// Result type used throughout the Flowmind kernel.
pub type Result<T> = std::result::Result<T, FlowmindError>;

/// The category of failure, matching the kernel's error-kind taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FlowmindErrorKind {
    /// Malformed workflow definition; structural integrity failure.
    Validation,
    /// Missing context slot, task, node, or other looked-up entity.
    NotFound,
    /// Missing or malformed credential/configuration.
    Config,
    /// An actor call failed at the integration boundary.
    Integration,
    /// A human actor rejected the task it was asked to perform.
    RejectedByHuman,
    /// A decision table evaluated with no matching rule and no default edge.
    NoMatchingRule,
    /// The requested mode (e.g. real robot control) isn't implemented.
    NotImplemented,
    /// The operation was cancelled before completion.
    Cancelled,
}

impl fmt::Display for FlowmindErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation-error",
            Self::NotFound => "not-found",
            Self::Config => "config-error",
            Self::Integration => "integration-error",
            Self::RejectedByHuman => "rejected-by-human",
            Self::NoMatchingRule => "no-matching-rule",
            Self::NotImplemented => "not-implemented",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// The kernel's unified error type.
///
/// Carries a [`FlowmindErrorKind`], a human-readable message, and an
/// optional chain of context strings attached via [`ErrorContext::context`].
#[derive(Debug, Clone, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[error("{kind}: {message}")]
pub struct FlowmindError {
    kind: FlowmindErrorKind,
    message: String,
    #[serde(default)]
    context: Vec<String>,
}

impl FlowmindError {
    fn new(kind: FlowmindErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Construct a validation-error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::Validation, message)
    }

    /// Construct a not-found error.
    #[must_use]
    pub fn not_found(entity: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(FlowmindErrorKind::NotFound, format!("{entity} not found: {id}"))
    }

    /// Construct a config-error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::Config, message)
    }

    /// Construct an integration-error.
    #[must_use]
    pub fn integration(message: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::Integration, message)
    }

    /// Construct a rejected-by-human error.
    #[must_use]
    pub fn rejected_by_human(reason: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::RejectedByHuman, reason)
    }

    /// Construct a no-matching-rule error.
    #[must_use]
    pub fn no_matching_rule(decision_node_id: impl fmt::Display) -> Self {
        Self::new(
            FlowmindErrorKind::NoMatchingRule,
            format!("no rule matched in decision node {decision_node_id} and no default edge is declared"),
        )
    }

    /// Construct a not-implemented error.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::NotImplemented, message)
    }

    /// Construct a cancelled error.
    #[must_use]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(FlowmindErrorKind::Cancelled, message)
    }

    /// The error's kind.
    #[must_use]
    pub fn kind(&self) -> &FlowmindErrorKind {
        &self.kind
    }

    /// The base message, without attached context.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context strings attached via [`ErrorContext::context`], outermost last.
    #[must_use]
    pub fn context_chain(&self) -> &[String] {
        &self.context
    }

    /// §7 propagation policy: validation and config errors are never
    /// retried; not-found, rejected-by-human, no-matching-rule,
    /// not-implemented, and cancelled are not retryable either — only
    /// integration errors (the actor-call boundary) are retryable by
    /// default. The retry wrapper (`flowmind-resilience`) layers its own
    /// non-retryable-kind and message-pattern overrides on top of this.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, FlowmindErrorKind::Integration)
    }
}

/// Extension trait for attaching a human-readable operation description to
/// a `Result`, without discarding the original error.
pub trait ErrorContext<T> {
    /// Attach context to the error path of this result.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|mut e| {
            e.context.push(message.into());
            e
        })
    }
}
