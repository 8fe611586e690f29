//! # Flowmind Actor
//!
//! Actor adapters realizing the four ways an activity can be carried out
//! (§4.3, §9 "Actor polymorphism"): `software`, `ai_agent`, `robot`, and
//! `human`. Each variant implements [`ActorAdapter`]; [`dispatch`] selects
//! one by `activity.actor_type` and runs it.

pub mod adapter;
pub mod ai;
pub mod dispatch;
pub mod human;
pub mod request;
pub mod robot;
pub mod software;

pub use adapter::ActorAdapter;
pub use ai::AiActor;
pub use dispatch::{dispatch, ActorConfig};
pub use human::HumanActor;
pub use request::ActorRequest;
pub use robot::RobotActor;
pub use software::SoftwareActor;
