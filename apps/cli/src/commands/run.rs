//! The `flowmind run <file>` subcommand (§6 CLI surface, §10.5).

use std::path::{Path, PathBuf};

use flowmind_engine::EngineStatus;

use crate::collaborators::{default_checkpoint_dir, DefaultCollaborators};
use crate::exit_code::{self, EX_OK};
use crate::runner;

pub async fn execute(file: &Path, verbose: bool, api_key: Option<String>, checkpoint_dir: Option<PathBuf>) -> i32 {
    let collaborators = DefaultCollaborators::new(checkpoint_dir.unwrap_or_else(default_checkpoint_dir));

    let outcome = match runner::run_workflow_file(file, api_key, &collaborators).await {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("error: {error}");
            return exit_code::for_error(&error);
        }
    };

    println!("status: {}", outcome.status);
    println!("{}", outcome.message);

    if verbose {
        for token in &outcome.tokens {
            println!("token {} (node {}, status {}):", token.id, token.current_node_id, token.status);
            for entry in &token.history {
                let node = entry.node_id.as_deref().unwrap_or("-");
                println!("  {} {} @ {}", entry.timestamp.to_rfc3339(), entry.action, node);
            }
        }
    }

    if outcome.status == EngineStatus::Failed {
        exit_code::EX_SOFTWARE
    } else {
        EX_OK
    }
}
