//! Scenario files for spawn layouts.
//!
//! A scenario names the agents to spawn, the player's patrol path and the
//! configuration shared by every agent. Scenarios are stored as RON so they
//! can be edited by hand:
//!
//! ```ron
//! (
//!     horde: (horde_max: 4, join_radius: 12.0),
//!     player: (waypoints: [(0.0, 0.0, 0.0), (30.0, 0.0, 0.0)], speed: 3.0),
//!     agents: [
//!         (id: 1, position: (5.0, 0.0, 5.0)),
//!         (id: 2, position: (6.0, 0.0, 4.0), archetype: LoneStalker),
//!     ],
//! )
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use horde_core::{AgentId, HordeConfig, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};
use crate::providers::ai::Archetype;
use crate::runtime::{Coordinator, CoordinatorConfig};

/// One agent to spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSpawn {
    pub id: AgentId,
    pub position: Vec3,
    #[serde(default)]
    pub archetype: Archetype,
    /// Overrides the scenario-wide horde configuration.
    #[serde(default)]
    pub config: Option<HordeConfig>,
}

/// Player movement along a closed loop of waypoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPath {
    pub waypoints: Vec<Vec3>,
    /// Units per second.
    pub speed: f32,
}

impl Default for PlayerPath {
    fn default() -> Self {
        Self {
            waypoints: Vec::new(),
            speed: 3.0,
        }
    }
}

impl PlayerPath {
    /// Player position after `elapsed` seconds, `None` without waypoints.
    pub fn position_at(&self, elapsed: f64) -> Option<Vec3> {
        let first = *self.waypoints.first()?;
        if self.waypoints.len() == 1 || self.speed <= 0.0 {
            return Some(first);
        }

        let legs: Vec<(Vec3, Vec3, f32)> = self
            .waypoints
            .iter()
            .zip(self.waypoints.iter().cycle().skip(1))
            .map(|(a, b)| (*a, *b, a.distance(*b)))
            .collect();
        let loop_length: f32 = legs.iter().map(|(_, _, len)| len).sum();
        if loop_length <= f32::EPSILON {
            return Some(first);
        }

        let mut travelled = (elapsed.max(0.0) as f32 * self.speed) % loop_length;
        for (from, to, length) in legs {
            if travelled <= length {
                if length <= f32::EPSILON {
                    return Some(from);
                }
                return Some(from.lerp(to, travelled / length));
            }
            travelled -= length;
        }
        Some(first)
    }
}

/// Spawn layout plus the configuration it should run with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Horde configuration for agents without an override.
    pub horde: HordeConfig,
    pub coordinator: CoordinatorConfig,
    pub player: PlayerPath,
    /// Distance within which the player can be seen.
    pub sight_range: f32,
    pub agents: Vec<AgentSpawn>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            horde: HordeConfig::default(),
            coordinator: CoordinatorConfig::default(),
            player: PlayerPath::default(),
            sight_range: 20.0,
            agents: Vec::new(),
        }
    }
}

impl Scenario {
    /// Loads a scenario from a RON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScenarioRead {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_ron_str(&content)?;

        tracing::info!(
            path = %path.display(),
            agents = scenario.agents.len(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(RuntimeError::ScenarioParse)
    }

    /// Effective horde configuration of one spawn.
    pub fn config_for(&self, spawn: &AgentSpawn) -> HordeConfig {
        spawn.config.unwrap_or(self.horde)
    }

    /// Spawns every agent into `coordinator`.
    ///
    /// Fails before spawning anything if an id appears twice or any agent's
    /// configuration is invalid.
    pub fn spawn_into(&self, coordinator: &mut Coordinator) -> Result<()> {
        let mut seen = BTreeSet::new();
        for spawn in &self.agents {
            if !seen.insert(spawn.id) {
                return Err(RuntimeError::DuplicateAgent(spawn.id));
            }
            self.config_for(spawn)
                .validate()
                .map_err(|source| RuntimeError::InvalidConfig {
                    agent: spawn.id,
                    source,
                })?;
        }

        for spawn in &self.agents {
            coordinator.spawn_agent(
                spawn.id,
                spawn.position,
                self.config_for(spawn),
                spawn.archetype,
            )?;
        }
        Ok(())
    }
}
