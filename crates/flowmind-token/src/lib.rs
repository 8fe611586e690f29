//! # Flowmind Token
//!
//! Token state, history, and status for the Flowmind workflow engine
//! (§3 "Token", §4.1).

pub mod history;
pub mod status;
pub mod token;

pub use history::{Action, Analytics, HistoryEntry, WasteCategory};
pub use status::TokenStatus;
pub use token::Token;
