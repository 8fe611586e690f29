//! # Flowmind Log
//!
//! Logging bootstrap for the Flowmind workflow engine CLI and embedders.
//! Reads `LOG_LEVEL`, `LOG_FORMAT`, and `LOG_TIMESTAMPS` (§6) and installs a
//! global `tracing_subscriber`. The kernel crates themselves only depend on
//! `tracing` directly and never call into this crate — only the process
//! entry point (the CLI, or an embedder's `main`) initializes logging once.

pub mod builder;
pub mod config;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, Format};
