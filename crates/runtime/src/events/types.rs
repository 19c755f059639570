//! Event types for different topics.

use horde_core::{AgentId, HordeId, Vec3};
use serde::{Deserialize, Serialize};

/// Horde formation and membership changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HordeEvent {
    /// A founding agent created a new horde at its position.
    Created {
        horde: HordeId,
        founder: AgentId,
        rally_point: Vec3,
        at: f64,
    },

    /// An agent became a member of a horde (founders included).
    Joined {
        agent: AgentId,
        horde: HordeId,
        at: f64,
    },

    /// An agent lost its membership (despawn or eviction).
    Left {
        agent: AgentId,
        horde: HordeId,
        at: f64,
    },

    /// A horde ceased to exist.
    Disbanded { horde: HordeId, at: f64 },

    /// A horde leader dragged the rally point somewhere new.
    RallyPointMoved {
        horde: HordeId,
        rally_point: Vec3,
        at: f64,
    },

    /// A coordination attempt found nobody to group with.
    Alone { agent: AgentId, at: f64 },
}

/// Player detection changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PerceptionEvent {
    PlayerSpotted {
        agent: AgentId,
        player_position: Vec3,
        at: f64,
    },
    PlayerLost { agent: AgentId, at: f64 },
}
