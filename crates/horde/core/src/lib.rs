//! Deterministic horde coordination shared by every agent controller.
//!
//! `horde-core` owns the canonical coordination state (agents, hordes) and
//! exposes pure spatial queries plus the membership transitions that keep the
//! two sides consistent. All mutation flows through [`HordeManager`], which is
//! the handle behavior-tree nodes receive on every tick.
//!
//! Nothing here touches an engine: positions are written by the host world
//! simulation and every other collaborator lives in the `runtime` crate.
pub mod agent;
pub mod config;
pub mod error;
pub mod horde;
pub mod manager;
pub mod store;
pub mod types;

pub use agent::{AgentRegistry, AgentState};
pub use config::{ConfigError, HordeConfig};
pub use error::{ErrorSeverity, HordeError, Result};
pub use horde::Horde;
pub use manager::HordeManager;
pub use store::HordeStore;
pub use types::{AgentId, HordeId};

/// Re-exported so hosts share the same vector type as the core.
pub use glam::Vec3;
