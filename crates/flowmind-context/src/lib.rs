//! # Flowmind Context
//!
//! The in-memory context slot manager (§3 "Context slot", §4.2). Owns a
//! `context_id -> value` mapping seeded from each declared context's
//! `initial_value`. Visibility and lifecycle are advisory for this kernel:
//! no eviction is performed for `cached` contexts; `transient` values are
//! cleared by [`ContextManager::clear_transient`] at engine completion;
//! `persistent` values survive checkpoints untouched.

use std::collections::HashMap;

use flowmind_error::{FlowmindError, Result};
use flowmind_workflow::model::{ContextDecl, Lifecycle};
use serde_json::Value;

struct Slot {
    value: Value,
    lifecycle: Lifecycle,
}

/// Owns every declared context slot for one running workflow.
#[derive(Default)]
pub struct ContextManager {
    slots: HashMap<String, Slot>,
}

impl ContextManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a manager from a workflow's declared contexts, deep-copying
    /// each `initial_value` (a `serde_json::Value` clone is already a deep
    /// copy).
    #[must_use]
    pub fn from_declarations(contexts: &[ContextDecl]) -> Self {
        let mut manager = Self::new();
        for decl in contexts {
            manager.register(
                decl.id.clone(),
                decl.initial_value.clone().unwrap_or(Value::Null),
                decl.lifecycle,
            );
        }
        manager
    }

    /// Register a new context slot, overwriting any existing slot with the
    /// same id.
    pub fn register(&mut self, context_id: impl Into<String>, initial_value: Value, lifecycle: Lifecycle) {
        self.slots.insert(
            context_id.into(),
            Slot {
                value: initial_value,
                lifecycle,
            },
        );
    }

    /// Read a context's current value.
    pub fn get(&self, context_id: &str) -> Result<&Value> {
        self.slots
            .get(context_id)
            .map(|slot| &slot.value)
            .ok_or_else(|| FlowmindError::not_found("context", context_id))
    }

    /// Replace a context's value wholesale.
    pub fn set(&mut self, context_id: &str, value: Value) -> Result<()> {
        let slot = self
            .slots
            .get_mut(context_id)
            .ok_or_else(|| FlowmindError::not_found("context", context_id))?;
        slot.value = value;
        Ok(())
    }

    /// Top-level merge of `patch` into a context's current value. Both the
    /// existing and incoming values must be JSON objects; non-object values
    /// are replaced outright.
    pub fn update(&mut self, context_id: &str, patch: Value) -> Result<()> {
        let slot = self
            .slots
            .get_mut(context_id)
            .ok_or_else(|| FlowmindError::not_found("context", context_id))?;
        match (&mut slot.value, patch) {
            (Value::Object(existing), Value::Object(incoming)) => {
                existing.extend(incoming);
            }
            (existing, incoming) => {
                *existing = incoming;
            }
        }
        Ok(())
    }

    /// Remove a context slot entirely.
    pub fn delete(&mut self, context_id: &str) -> Result<()> {
        self.slots
            .remove(context_id)
            .map(|_| ())
            .ok_or_else(|| FlowmindError::not_found("context", context_id))
    }

    /// Clear every `transient` slot. Called once the engine reaches a
    /// terminal status.
    pub fn clear_transient(&mut self) {
        self.slots
            .retain(|_, slot| !matches!(slot.lifecycle, Lifecycle::Transient));
    }

    /// Snapshot every slot's current value, for checkpointing.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.slots
            .iter()
            .map(|(id, slot)| (id.clone(), slot.value.clone()))
            .collect()
    }
}
