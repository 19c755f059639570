//! Public runtime API surface.
//!
//! This module gathers the contracts hosts implement (perception, navigation,
//! time) and the error type returned by the coordinator.

pub mod collaborators;
pub mod errors;

pub use collaborators::{Clock, ManualClock, Navigator, Perception};
pub use errors::{Result, RuntimeError};
