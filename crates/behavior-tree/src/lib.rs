//! Lightweight behavior tree library for frame-driven agent coordination.
//!
//! This library provides a minimal, deterministic behavior tree implementation
//! intended to be ticked once per agent per host frame.
//!
//! - **No delta time**: Every tick resolves within a single call
//! - **Single-frame progress**: Actions may report [`Status::InProgress`] while an
//!   external system (e.g. navigation) carries out their request
//! - **No retained node state**: Trees are immutable and shared by every agent
//! - **Zero dependencies**: Pure Rust with no external crates
//!
//! # Architecture
//!
//! - [`Behavior`]: Core trait for all nodes
//! - [`Status`]: Success, Failure or InProgress
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`Inverter`], [`AlwaysSucceed`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod status;

// Re-export core types for ergonomic API
pub use behavior::Behavior;
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Inverter};
pub use status::Status;
