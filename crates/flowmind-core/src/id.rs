//! Strongly-typed identifiers for Flowmind entities.
//!
//! Each identifier wraps a UUIDv4 via [`domain-key`](https://crates.io/crates/domain-key)'s
//! `Uuid<D>` marker pattern. Identifiers are `Copy`, serialize as plain UUID
//! strings, and are incompatible at the type level with one another: passing
//! a [`TokenId`] where a [`WorkflowId`] is expected is a compile error.

use domain_key::define_uuid;

pub use domain_key::UuidParseError;

define_uuid!(WorkflowIdDomain => WorkflowId);
define_uuid!(TokenIdDomain => TokenId);
define_uuid!(ActivityIdDomain => ActivityId);
define_uuid!(EdgeIdDomain => EdgeId);
define_uuid!(ContextIdDomain => ContextId);
define_uuid!(RoleIdDomain => RoleId);
define_uuid!(HumanTaskIdDomain => HumanTaskId);
define_uuid!(DeadLetterIdDomain => DeadLetterId);
define_uuid!(CheckpointIdDomain => CheckpointId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        fn accepts_token(_id: TokenId) {}
        fn accepts_workflow(_id: WorkflowId) {}

        accepts_token(TokenId::v4());
        accepts_workflow(WorkflowId::v4());
        // accepts_token(WorkflowId::v4()); // would not compile
    }

    #[test]
    fn v4_is_not_nil() {
        assert!(!TokenId::v4().is_nil());
        assert!(!HumanTaskId::v4().is_nil());
    }

    #[test]
    fn parse_roundtrips() {
        let id = ActivityId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(EdgeId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let id = ContextId::v4();
        let json = serde_json::to_string(&id).unwrap();
        let back: ContextId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
