//! Behavior-tree AI for horde agents.
//!
//! Trees are layered the same way for every archetype:
//!
//! 1. **Nodes**: single conditions and actions over [`AiContext`]
//! 2. **Subtrees**: patterns (one condition plus one action) and tactics
//!    (patterns combined toward one goal)
//! 3. **Presets**: complete trees per [`Archetype`], with fallbacks
//!
//! Every tree is ticked once per agent per frame and resolves within that
//! call.

pub mod context;
pub mod nodes;
pub mod presets;
pub mod subtrees;

use behavior_tree::Behavior;
use serde::{Deserialize, Serialize};

pub use context::AiContext;

/// Type alias for complete behavior trees.
pub type BehaviorTree = Box<dyn Behavior<AiContext>>;

/// Agent archetypes with a preset tree each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Archetype {
    /// Groups up, follows its horde and chases the player on sight.
    #[default]
    HordeGrunt,
    /// Never joins a horde; chases on sight, otherwise roams.
    LoneStalker,
    /// Stands still. Useful for tests and scripted props.
    Dummy,
}

impl Archetype {
    /// Builds the preset tree for this archetype.
    pub fn tree(self) -> BehaviorTree {
        match self {
            Archetype::HordeGrunt => presets::horde_grunt(),
            Archetype::LoneStalker => presets::lone_stalker(),
            Archetype::Dummy => presets::dummy(),
        }
    }
}
