//! The `serve` subcommand's axum application (§6, §10.5).

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, AuthConfig};
