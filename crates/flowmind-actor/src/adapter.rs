//! The actor capability interface (§9 "Actor polymorphism").

use async_trait::async_trait;
use flowmind_error::Result;
use serde_json::Value;

use crate::request::ActorRequest;

/// A single contract realized by four variants, selected by a tag-dispatch
/// on `activity.actor_type` (§4.3, §9).
#[async_trait]
pub trait ActorAdapter: Send + Sync {
    async fn execute(&self, request: ActorRequest<'_>) -> Result<Value>;
}
