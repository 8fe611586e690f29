//! Argument parsing for the `flowmind` binary (§6 "CLI surface").

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "flowmind", version, about = "Flowmind workflow execution engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load, validate, and run a workflow file to completion.
    Run {
        /// Path to the workflow's JSON file (§6 "Workflow file format").
        file: PathBuf,
        /// Emit a per-token history summary and progress logging.
        #[arg(long)]
        verbose: bool,
        /// Credential passed through to the AI actor as `GEMINI_API_KEY`.
        #[arg(long = "key")]
        api_key: Option<String>,
        /// Directory holding `<workflow_id>.state.json` checkpoint files
        /// (§6 "Persisted state layout"); defaults to the platform data dir.
        #[arg(long)]
        checkpoint_dir: Option<PathBuf>,
    },
    /// Boot the HTTP control plane (§6 "HTTP control plane").
    Serve {
        /// Port to bind (default 3000).
        #[arg(long)]
        port: Option<u16>,
        /// HS256 secret validating `Authorization: Bearer <jwt>`.
        #[arg(long)]
        jwt_secret: Option<String>,
        /// `<key>:<role>` pair, repeatable, validating `X-API-Key`.
        #[arg(long = "api-key", value_name = "KEY:ROLE")]
        api_keys: Vec<String>,
        /// Requests per second per client, enforced by a token-bucket limiter.
        #[arg(long)]
        rate_limit: Option<u32>,
        /// Disable authentication entirely.
        #[arg(long)]
        no_auth: bool,
        /// Optional TOML file layered beneath the environment and these flags.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory holding `<workflow_id>.state.json` checkpoint files
        /// (§6 "Persisted state layout"); defaults to the platform data dir.
        #[arg(long)]
        checkpoint_dir: Option<PathBuf>,
    },
}
