//! Horde entity store.
//!
//! Owns every active horde and is the only writer of membership on both sides
//! (the horde's member set and the agent's back-reference).

use std::collections::BTreeMap;

use glam::Vec3;

use crate::agent::AgentState;
use crate::error::{HordeError, Result};
use crate::horde::Horde;
use crate::types::{AgentId, HordeId};

#[derive(Clone, Debug)]
pub struct HordeStore {
    hordes: BTreeMap<HordeId, Horde>,
    next_id: HordeId,
}

impl HordeStore {
    pub fn new() -> Self {
        Self {
            hordes: BTreeMap::new(),
            next_id: HordeId::FIRST,
        }
    }

    /// Allocates a horde with a fresh id and no members.
    pub fn create(&mut self, initial_position: Vec3, capacity: usize) -> HordeId {
        let id = self.next_id;
        self.next_id = id.next();
        self.hordes.insert(id, Horde::new(id, initial_position, capacity));
        tracing::info!(horde = %id, capacity, position = ?initial_position, "horde created");
        id
    }

    pub fn get(&self, id: HordeId) -> Result<&Horde> {
        self.hordes.get(&id).ok_or(HordeError::HordeNotFound(id))
    }

    pub fn get_mut(&mut self, id: HordeId) -> Result<&mut Horde> {
        self.hordes.get_mut(&id).ok_or(HordeError::HordeNotFound(id))
    }

    /// Adds `agent` to the horde and points the agent at it.
    ///
    /// If the agent is already a member this is a no-op. If it belongs to a
    /// different horde it is evicted from that one first, but only once the
    /// target is known to have room, so a `Full` or `HordeNotFound` result
    /// leaves every horde and the agent unmodified.
    pub fn add_member(&mut self, horde_id: HordeId, agent: &mut AgentState) -> Result<()> {
        let horde = self.get(horde_id)?;
        if horde.contains(agent.id) {
            agent.horde = Some(horde_id);
            return Ok(());
        }
        if horde.is_full() {
            return Err(HordeError::Full {
                horde: horde_id,
                capacity: horde.capacity(),
            });
        }

        if let Some(previous) = agent.horde
            && previous != horde_id
        {
            self.remove_member(previous, agent.id)?;
            tracing::debug!(agent = %agent.id, from = %previous, to = %horde_id, "evicted before rejoin");
        }

        self.get_mut(horde_id)?.members.insert(agent.id);
        agent.horde = Some(horde_id);
        Ok(())
    }

    /// Removes `agent_id` from the horde's member set.
    ///
    /// Returns whether the agent was a member. The caller is responsible for
    /// clearing the agent's back-reference.
    pub fn remove_member(&mut self, horde_id: HordeId, agent_id: AgentId) -> Result<bool> {
        Ok(self.get_mut(horde_id)?.members.remove(&agent_id))
    }

    /// Removes the horde and hands it back so the caller can release its
    /// members.
    pub fn disband(&mut self, horde_id: HordeId) -> Result<Horde> {
        let horde = self
            .hordes
            .remove(&horde_id)
            .ok_or(HordeError::HordeNotFound(horde_id))?;
        tracing::info!(horde = %horde_id, members = horde.len(), "horde disbanded");
        Ok(horde)
    }

    /// Hordes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Horde> {
        self.hordes.values()
    }

    pub fn len(&self) -> usize {
        self.hordes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hordes.is_empty()
    }
}

impl Default for HordeStore {
    fn default() -> Self {
        Self::new()
    }
}
