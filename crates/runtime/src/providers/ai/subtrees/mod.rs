//! Reusable behavior tree subtrees.
//!
//! Subtrees are organized into two layers:
//!
//! - **Layer 1 (Patterns)**: a condition guarding an action, or one
//!   self-contained decision such as horde coordination
//! - **Layer 2 (Tactics)**: patterns combined toward one goal
//!
//! # Architecture
//!
//! ```text
//! Layer 2 (tactics)
//!     ├─ horde_advance()
//!     │   ├─ chase_player()           ← Layer 1
//!     │   └─ follow_horde()           ← Layer 1
//!     └─ stay_grouped()
//!         ├─ coordinate_horde()       ← Layer 1
//!         └─ SyncHordeState           ← node
//! ```

pub mod patterns;
pub mod tactics;

pub use super::BehaviorTree;
