use std::collections::BTreeSet;

use glam::Vec3;

use crate::types::{AgentId, HordeId};

/// A capacity-bounded group of agents sharing a rally point.
///
/// # Invariants
///
/// - `members.len() <= capacity`
/// - every member's `AgentState::horde` is `Some(self.id)`
///
/// Membership is only changed through [`crate::HordeStore`], which upholds
/// both invariants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horde {
    pub id: HordeId,
    pub rally_point: Vec3,
    pub(crate) members: BTreeSet<AgentId>,
    capacity: usize,
}

impl Horde {
    pub(crate) fn new(id: HordeId, rally_point: Vec3, capacity: usize) -> Self {
        Self {
            id,
            rally_point,
            members: BTreeSet::new(),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.members.contains(&agent)
    }

    /// Members in ascending id order.
    pub fn members(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.members.iter().copied()
    }

    /// Lowest-id member, used as the horde's leader.
    pub fn leader(&self) -> Option<AgentId> {
        self.members.first().copied()
    }
}
