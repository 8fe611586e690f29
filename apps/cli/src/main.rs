//! `flowmind`: CLI and HTTP control plane for the workflow execution engine.

mod cli;
mod collaborators;
mod commands;
mod config;
mod exit_code;
mod http;
mod rate_limit;
mod runner;

use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let _guard = flowmind_log::LoggerBuilder::from_env().build().ok();

    let cli = Cli::parse();
    let code = match cli.command {
        Command::Run { file, verbose, api_key, checkpoint_dir } => {
            commands::run::execute(&file, verbose, api_key, checkpoint_dir).await
        }
        Command::Serve { port, jwt_secret, api_keys, rate_limit, no_auth, config, checkpoint_dir } => {
            match commands::serve::execute(port, jwt_secret, api_keys, rate_limit, no_auth, config, checkpoint_dir).await {
                Ok(()) => exit_code::EX_OK,
                Err(error) => {
                    eprintln!("error: {error}");
                    exit_code::EX_SOFTWARE
                }
            }
        }
    };

    std::process::exit(code);
}
