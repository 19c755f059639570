//! Live agents as seen by the coordination layer.

use std::collections::BTreeMap;

use glam::Vec3;

use crate::config::HordeConfig;
use crate::types::{AgentId, HordeId};

/// Coordination state of a single agent.
///
/// `position` is owned by the host world simulation and refreshed through
/// [`AgentRegistry::set_position`]; everything else is written by the
/// coordination layer itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id: AgentId,
    pub position: Vec3,

    /// Current horde, `None` while unassigned.
    ///
    /// Only [`crate::HordeStore`] writes this field so that it always mirrors
    /// the horde's member set.
    pub(crate) horde: Option<HordeId>,

    /// Time of the last coordination attempt that passed the check gate.
    pub last_horde_check: Option<f64>,

    /// Set when the last attempt found nobody to group with.
    pub alone: bool,

    /// Whether perception reported the player on the last check.
    pub sees_player: bool,

    /// Last known player position, kept after sight is lost.
    pub player_position: Option<Vec3>,

    pub config: HordeConfig,
}

impl AgentState {
    pub fn new(id: AgentId, position: Vec3, config: HordeConfig) -> Self {
        Self {
            id,
            position,
            horde: None,
            last_horde_check: None,
            alone: false,
            sees_player: false,
            player_position: None,
            config,
        }
    }

    #[inline]
    pub fn horde(&self) -> Option<HordeId> {
        self.horde
    }

    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.horde.is_none()
    }

    /// Slack for clocks that accumulate fixed frame steps in floating point.
    const CHECK_EPSILON: f64 = 1e-9;

    /// True when the agent has never checked or its interval has elapsed.
    pub fn is_check_due(&self, now: f64) -> bool {
        match self.last_horde_check {
            None => true,
            Some(last) => {
                now - last + Self::CHECK_EPSILON >= self.config.effective_check_interval()
            }
        }
    }
}

/// All live agents, keyed and iterated by id.
///
/// Iteration order is ascending [`AgentId`], which is also the order in which
/// agents are ticked each frame.
#[derive(Clone, Debug, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, AgentState>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an agent, replacing any previous state stored under the same
    /// id. The replaced state is returned.
    pub(crate) fn insert(&mut self, agent: AgentState) -> Option<AgentState> {
        self.agents.insert(agent.id, agent)
    }

    pub(crate) fn remove(&mut self, id: AgentId) -> Option<AgentState> {
        self.agents.remove(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn position(&self, id: AgentId) -> Option<Vec3> {
        self.agents.get(&id).map(|agent| agent.position)
    }

    /// Writes a position reported by the world simulation. Returns `false` for
    /// unknown agents.
    pub fn set_position(&mut self, id: AgentId, position: Vec3) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                agent.position = position;
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentState> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_gate_uses_clamped_interval() {
        let mut agent = AgentState::new(
            AgentId(1),
            Vec3::ZERO,
            HordeConfig::new().with_check_interval(0.0),
        );
        assert!(agent.is_check_due(0.0));

        agent.last_horde_check = Some(10.0);
        assert!(!agent.is_check_due(10.05));
        assert!(agent.is_check_due(10.1));
    }

    #[test]
    fn accumulated_frame_steps_hit_every_check() {
        let mut agent = AgentState::new(
            AgentId(1),
            Vec3::ZERO,
            HordeConfig::new().with_check_interval(0.1),
        );
        let mut now = 0.0;
        agent.last_horde_check = Some(now);

        for _ in 0..200 {
            now += 0.1;
            assert!(agent.is_check_due(now), "missed check at {now}");
            agent.last_horde_check = Some(now);
        }
    }

    #[test]
    fn registry_iterates_in_id_order() {
        let mut registry = AgentRegistry::new();
        for id in [7, 2, 5] {
            registry.insert(AgentState::new(AgentId(id), Vec3::ZERO, HordeConfig::new()));
        }

        let ids: Vec<_> = registry.ids().collect();
        assert_eq!(ids, vec![AgentId(2), AgentId(5), AgentId(7)]);
    }

    #[test]
    fn set_position_ignores_unknown_agents() {
        let mut registry = AgentRegistry::new();
        registry.insert(AgentState::new(AgentId(1), Vec3::ZERO, HordeConfig::new()));

        assert!(registry.set_position(AgentId(1), Vec3::X));
        assert!(!registry.set_position(AgentId(2), Vec3::X));
        assert_eq!(registry.position(AgentId(1)), Some(Vec3::X));
    }
}
