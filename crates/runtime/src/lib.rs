//! Frame-driven horde coordination for enemy agents.
//!
//! This crate adapts the engine-free coordination service from `horde-core`
//! to behavior trees and drives those trees once per agent per host frame.
//! Hosts embed [`Coordinator`], feed it positions and the player's location,
//! and apply the navigation requests it emits.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the frame driver and its builder
//! - [`api`] exposes the collaborator traits and error types
//! - [`events`] provides the topic-based bus consumed by presentation layers
//! - [`providers`] holds the behavior-tree nodes, subtrees and presets
//! - [`scenario`] loads spawn layouts from RON files
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;
pub mod scenario;

pub use api::{Clock, ManualClock, Navigator, Perception, Result, RuntimeError};
pub use events::{Event, EventBus, HordeEvent, PerceptionEvent, Topic};
pub use providers::ai::{AiContext, Archetype, BehaviorTree};
pub use runtime::{Coordinator, CoordinatorBuilder, CoordinatorConfig, FrameReport};
pub use scenario::{AgentSpawn, PlayerPath, Scenario};
