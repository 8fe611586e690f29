//! # Flowmind Expression
//!
//! Two small, deliberately distinct grammars (§4.4, §4.8, §9): the
//! FEEL-subset decision table input-entry language with its hit-policy
//! reduction, and the minimal edge guard grammar. Neither delegates to a
//! host-language `eval`.

pub mod feel;
pub mod guard;
pub mod hit_policy;

pub use hit_policy::{evaluate_node, evaluate_table, DecisionResult};
