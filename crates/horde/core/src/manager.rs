//! Coordination-service handle.
//!
//! [`HordeManager`] pairs the agent registry with the horde store and is the
//! only public way to mutate either, so the symmetric-membership invariant can
//! be enforced in one place. Spatial queries are pure reads over the current
//! snapshot of positions.

use glam::Vec3;

use crate::agent::{AgentRegistry, AgentState};
use crate::config::HordeConfig;
use crate::error::{HordeError, Result};
use crate::horde::Horde;
use crate::store::HordeStore;
use crate::types::{AgentId, HordeId};

#[derive(Clone, Debug, Default)]
pub struct HordeManager {
    agents: AgentRegistry,
    hordes: HordeStore,
    disband_empty: bool,
}

impl HordeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disband hordes automatically once their last member leaves.
    ///
    /// Off by default: hordes persist as rally points that later agents can
    /// still join.
    #[must_use]
    pub fn with_disband_empty(mut self, disband_empty: bool) -> Self {
        self.disband_empty = disband_empty;
        self
    }

    pub fn agents(&self) -> &AgentRegistry {
        &self.agents
    }

    pub fn hordes(&self) -> &HordeStore {
        &self.hordes
    }

    pub fn agent(&self, id: AgentId) -> Result<&AgentState> {
        self.agents.get(id).ok_or(HordeError::AgentNotFound(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Result<&mut AgentState> {
        self.agents.get_mut(id).ok_or(HordeError::AgentNotFound(id))
    }

    pub fn horde(&self, id: HordeId) -> Result<&Horde> {
        self.hordes.get(id)
    }

    // ========================================================================
    // Agent lifecycle
    // ========================================================================

    /// Registers a new agent as unassigned.
    ///
    /// Spawning over an existing id first removes the old agent (and its
    /// membership).
    pub fn spawn_agent(&mut self, id: AgentId, position: Vec3, config: HordeConfig) {
        if self.agents.contains(id) {
            tracing::warn!(agent = %id, "respawning over a live agent");
            // The agent exists, so removal cannot fail.
            let _ = self.remove_agent(id);
        }
        self.agents.insert(AgentState::new(id, position, config));
        tracing::debug!(agent = %id, ?position, "agent spawned");
    }

    /// Despawns an agent, evicting it from its horde first.
    pub fn remove_agent(&mut self, id: AgentId) -> Result<AgentState> {
        self.leave_horde(id)?;
        let agent = self.agents.remove(id).ok_or(HordeError::AgentNotFound(id))?;
        tracing::info!(agent = %id, "agent removed");
        Ok(agent)
    }

    /// Forwards a position reported by the world simulation.
    pub fn set_position(&mut self, id: AgentId, position: Vec3) -> Result<()> {
        if self.agents.set_position(id, position) {
            Ok(())
        } else {
            Err(HordeError::AgentNotFound(id))
        }
    }

    // ========================================================================
    // Spatial queries
    // ========================================================================

    /// Counts unassigned agents within `radius` of `position` (inclusive).
    pub fn count_unassigned_nearby(&self, position: Vec3, radius: f32) -> usize {
        self.agents
            .iter()
            .filter(|agent| agent.is_unassigned() && agent.position.distance(position) <= radius)
            .count()
    }

    /// Closest non-full horde whose rally point lies within `radius`.
    ///
    /// Ties go to the lowest horde id: hordes are visited in ascending id
    /// order and only a strictly smaller distance replaces the current best.
    pub fn nearest_joinable_horde(&self, position: Vec3, radius: f32) -> Option<&Horde> {
        let mut best: Option<(&Horde, f32)> = None;
        for horde in self.hordes.iter() {
            if horde.is_full() {
                continue;
            }
            let distance = horde.rally_point.distance(position);
            if distance > radius {
                continue;
            }
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((horde, distance)),
            }
        }
        best.map(|(horde, _)| horde)
    }

    // ========================================================================
    // Horde lifecycle and membership
    // ========================================================================

    /// Creates an empty horde. A horde nobody can join is rejected.
    pub fn create_horde(&mut self, position: Vec3, capacity: usize) -> Result<HordeId> {
        if capacity == 0 {
            return Err(HordeError::ZeroCapacity);
        }
        Ok(self.hordes.create(position, capacity))
    }

    pub fn join_horde(&mut self, agent_id: AgentId, horde_id: HordeId) -> Result<()> {
        let agent = self
            .agents
            .get_mut(agent_id)
            .ok_or(HordeError::AgentNotFound(agent_id))?;
        let previous = agent.horde;
        self.hordes.add_member(horde_id, agent)?;

        if let Some(previous) = previous
            && previous != horde_id
        {
            self.disband_if_empty(previous)?;
        }
        tracing::debug!(agent = %agent_id, horde = %horde_id, "joined horde");
        Ok(())
    }

    /// Clears the agent's membership. Returns the horde it left, if any.
    pub fn leave_horde(&mut self, agent_id: AgentId) -> Result<Option<HordeId>> {
        let agent = self
            .agents
            .get_mut(agent_id)
            .ok_or(HordeError::AgentNotFound(agent_id))?;
        let Some(horde_id) = agent.horde.take() else {
            return Ok(None);
        };

        if !self.hordes.remove_member(horde_id, agent_id)? {
            tracing::warn!(agent = %agent_id, horde = %horde_id, "agent was not in its horde's member set");
        }
        self.disband_if_empty(horde_id)?;
        tracing::debug!(agent = %agent_id, horde = %horde_id, "left horde");
        Ok(Some(horde_id))
    }

    /// Removes the horde and releases every member.
    pub fn disband_horde(&mut self, horde_id: HordeId) -> Result<Horde> {
        let horde = self.hordes.disband(horde_id)?;
        for member in horde.members() {
            if let Some(agent) = self.agents.get_mut(member) {
                agent.horde = None;
            }
        }
        Ok(horde)
    }

    pub fn set_rally_point(&mut self, horde_id: HordeId, position: Vec3) -> Result<()> {
        self.hordes.get_mut(horde_id)?.rally_point = position;
        Ok(())
    }

    fn disband_if_empty(&mut self, horde_id: HordeId) -> Result<()> {
        if self.disband_empty && self.hordes.get(horde_id)?.is_empty() {
            self.disband_horde(horde_id)?;
        }
        Ok(())
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Verifies capacity and symmetric membership across both sides.
    pub fn check_membership(&self) -> Result<()> {
        for horde in self.hordes.iter() {
            if horde.len() > horde.capacity() {
                let agent = horde.members().last().unwrap_or(AgentId(0));
                return Err(HordeError::Inconsistent {
                    reason: "horde over capacity",
                    agent,
                    horde: horde.id,
                });
            }
            for member in horde.members() {
                let back_reference = self.agents.get(member).and_then(AgentState::horde);
                if back_reference != Some(horde.id) {
                    return Err(HordeError::Inconsistent {
                        reason: "member without back-reference",
                        agent: member,
                        horde: horde.id,
                    });
                }
            }
        }

        for agent in self.agents.iter() {
            if let Some(horde_id) = agent.horde {
                let listed = self
                    .hordes
                    .get(horde_id)
                    .map(|horde| horde.contains(agent.id))
                    .unwrap_or(false);
                if !listed {
                    return Err(HordeError::Inconsistent {
                        reason: "agent points at a horde that does not list it",
                        agent: agent.id,
                        horde: horde_id,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with(agents: &[(u32, Vec3)]) -> HordeManager {
        let mut manager = HordeManager::new();
        for &(id, position) in agents {
            manager.spawn_agent(AgentId(id), position, HordeConfig::new());
        }
        manager
    }

    #[test]
    fn count_includes_self_at_zero_radius() {
        let manager = manager_with(&[(1, Vec3::new(3.0, 0.0, 4.0))]);
        let position = manager.agent(AgentId(1)).unwrap().position;
        assert_eq!(manager.count_unassigned_nearby(position, 0.0), 1);
    }

    #[test]
    fn count_skips_assigned_and_distant_agents() {
        let mut manager = manager_with(&[
            (1, Vec3::ZERO),
            (2, Vec3::new(5.0, 0.0, 0.0)),
            (3, Vec3::new(10.0, 0.0, 0.0)),
            (4, Vec3::new(10.5, 0.0, 0.0)),
        ]);
        let horde = manager.create_horde(Vec3::ZERO, 4).unwrap();
        manager.join_horde(AgentId(2), horde).unwrap();

        // Boundary is inclusive: agent 3 sits exactly on the radius.
        assert_eq!(manager.count_unassigned_nearby(Vec3::ZERO, 10.0), 2);
    }

    #[test]
    fn nearest_skips_full_and_out_of_range() {
        let mut manager = manager_with(&[(1, Vec3::ZERO)]);
        let full = manager.create_horde(Vec3::new(1.0, 0.0, 0.0), 1).unwrap();
        manager.join_horde(AgentId(1), full).unwrap();
        let far = manager.create_horde(Vec3::new(50.0, 0.0, 0.0), 3).unwrap();
        let near = manager.create_horde(Vec3::new(4.0, 0.0, 0.0), 3).unwrap();

        let found = manager.nearest_joinable_horde(Vec3::ZERO, 10.0).map(|h| h.id);
        assert_eq!(found, Some(near));
        assert_ne!(found, Some(far));
        assert!(manager.nearest_joinable_horde(Vec3::ZERO, 0.5).is_none());
    }

    #[test]
    fn nearest_breaks_ties_by_lowest_id() {
        let mut manager = HordeManager::new();
        let ids: Vec<_> = (0..7)
            .map(|_| manager.create_horde(Vec3::new(100.0, 0.0, 0.0), 3).unwrap())
            .collect();
        // Move two hordes to equal distances on opposite sides.
        manager.set_rally_point(ids[6], Vec3::new(-2.0, 0.0, 0.0)).unwrap();
        manager.set_rally_point(ids[4], Vec3::new(2.0, 0.0, 0.0)).unwrap();

        let found = manager.nearest_joinable_horde(Vec3::ZERO, 10.0).map(|h| h.id);
        assert_eq!(found, Some(HordeId(5)));
        assert_eq!(ids[4], HordeId(5));
    }

    #[test]
    fn remove_agent_evicts_membership() {
        let mut manager = manager_with(&[(1, Vec3::ZERO), (2, Vec3::ZERO)]);
        let horde = manager.create_horde(Vec3::ZERO, 3).unwrap();
        manager.join_horde(AgentId(1), horde).unwrap();
        manager.join_horde(AgentId(2), horde).unwrap();

        manager.remove_agent(AgentId(1)).unwrap();

        assert_eq!(manager.horde(horde).unwrap().len(), 1);
        assert!(manager.agent(AgentId(1)).is_err());
        manager.check_membership().unwrap();
    }

    #[test]
    fn empty_hordes_persist_by_default() {
        let mut manager = manager_with(&[(1, Vec3::ZERO)]);
        let horde = manager.create_horde(Vec3::ZERO, 3).unwrap();
        manager.join_horde(AgentId(1), horde).unwrap();

        assert_eq!(manager.leave_horde(AgentId(1)).unwrap(), Some(horde));
        assert!(manager.horde(horde).unwrap().is_empty());
    }

    #[test]
    fn empty_hordes_disband_when_enabled() {
        let mut manager = manager_with(&[(1, Vec3::ZERO)]).with_disband_empty(true);
        let old = manager.create_horde(Vec3::ZERO, 3).unwrap();
        let new = manager.create_horde(Vec3::ONE, 3).unwrap();
        manager.join_horde(AgentId(1), old).unwrap();
        manager.join_horde(AgentId(1), new).unwrap();

        assert_eq!(
            manager.horde(old).unwrap_err(),
            HordeError::HordeNotFound(old)
        );
        manager.remove_agent(AgentId(1)).unwrap();
        assert!(manager.hordes().is_empty());
    }

    #[test]
    fn disband_releases_members() {
        let mut manager = manager_with(&[(1, Vec3::ZERO), (2, Vec3::ZERO)]);
        let horde = manager.create_horde(Vec3::ZERO, 3).unwrap();
        manager.join_horde(AgentId(1), horde).unwrap();
        manager.join_horde(AgentId(2), horde).unwrap();

        let disbanded = manager.disband_horde(horde).unwrap();

        assert_eq!(disbanded.len(), 2);
        assert!(manager.agent(AgentId(1)).unwrap().is_unassigned());
        assert!(manager.agent(AgentId(2)).unwrap().is_unassigned());
        manager.check_membership().unwrap();
    }

    #[test]
    fn respawn_over_live_agent_clears_membership() {
        let mut manager = manager_with(&[(1, Vec3::ZERO)]);
        let horde = manager.create_horde(Vec3::ZERO, 3).unwrap();
        manager.join_horde(AgentId(1), horde).unwrap();

        manager.spawn_agent(AgentId(1), Vec3::ONE, HordeConfig::new());

        assert!(manager.horde(horde).unwrap().is_empty());
        assert!(manager.agent(AgentId(1)).unwrap().is_unassigned());
        manager.check_membership().unwrap();
    }

    #[test]
    fn zero_capacity_horde_is_rejected() {
        let mut manager = HordeManager::new();

        assert_eq!(
            manager.create_horde(Vec3::ZERO, 0),
            Err(HordeError::ZeroCapacity)
        );
        assert!(manager.hordes().is_empty());
    }
}
