//! Blackboard shared by every node of a coordination tick.
//!
//! The [`AiContext`] owns the coordination-service handle
//! ([`HordeManager`]) together with the host collaborators, and carries a
//! cursor (`agent`, `now`) that the frame driver moves from agent to agent.
//! Trees are therefore stateless and can be shared by all agents of an
//! archetype.

use std::collections::BTreeMap;

use behavior_tree::Status;
use horde_core::{AgentId, AgentState, HordeManager, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::api::{Navigator, Perception};
use crate::events::{Event, EventBus};

/// Context for a single agent's coordination tick.
///
/// # Design
///
/// 1. **Coordination state**: the [`HordeManager`], injected once and reused
///    for every tick instead of living in a global
/// 2. **Collaborators**: perception and navigation provided by the host
/// 3. **Cursor**: the agent being evaluated and the current time
/// 4. **Blackboard**: per-tick scratch values (cached rally point) and
///    per-agent memory that outlives a tick (roam targets)
pub struct AiContext {
    /// The agent being evaluated.
    pub agent: AgentId,

    /// Current time in seconds, as reported by the host clock.
    pub now: f64,

    manager: HordeManager,
    perception: Box<dyn Perception>,
    navigator: Box<dyn Navigator>,
    events: EventBus,

    /// Seeded so that roaming is reproducible for a given scenario.
    rng: StdRng,
    roam_radius: f32,

    /// Player location reported by the host this frame, if any.
    player_position: Option<Vec3>,

    /// Rally point of the current agent's horde, filled by `SyncHordeState`.
    rally_point: Option<Vec3>,

    /// Perception answer for the focused agent, once asked this tick.
    sighting: Option<Option<Vec3>>,

    roam_targets: BTreeMap<AgentId, Vec3>,
}

impl AiContext {
    pub fn new(
        manager: HordeManager,
        perception: Box<dyn Perception>,
        navigator: Box<dyn Navigator>,
        events: EventBus,
    ) -> Self {
        Self {
            agent: AgentId(0),
            now: 0.0,
            manager,
            perception,
            navigator,
            events,
            rng: StdRng::seed_from_u64(0),
            roam_radius: 10.0,
            player_position: None,
            rally_point: None,
            sighting: None,
            roam_targets: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_roam_radius(mut self, radius: f32) -> Self {
        self.roam_radius = radius.max(0.0);
        self
    }

    /// Points the cursor at `agent` and resets per-tick scratch values.
    pub fn focus(&mut self, agent: AgentId, now: f64) {
        self.agent = agent;
        self.now = now;
        self.rally_point = None;
        self.sighting = None;
    }

    // ========================================================================
    // Coordination state
    // ========================================================================

    pub fn manager(&self) -> &HordeManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut HordeManager {
        &mut self.manager
    }

    /// State of the focused agent, `None` if it was despawned.
    pub fn agent_state(&self) -> Option<&AgentState> {
        self.manager.agents().get(self.agent)
    }

    pub fn agent_state_mut(&mut self) -> Option<&mut AgentState> {
        self.manager.agent_mut(self.agent).ok()
    }

    pub fn position(&self) -> Option<Vec3> {
        self.manager.agents().position(self.agent)
    }

    // ========================================================================
    // Perception
    // ========================================================================

    pub fn player_position(&self) -> Option<Vec3> {
        self.player_position
    }

    pub fn set_player_position(&mut self, position: Option<Vec3>) {
        self.player_position = position;
    }

    /// Player position if the focused agent can see it this tick.
    ///
    /// The host is asked at most once per agent per tick; later nodes get
    /// the same answer.
    pub fn sight_player(&mut self) -> Option<Vec3> {
        if let Some(sighting) = self.sighting {
            return sighting;
        }
        let sighting = self.visible_player();
        self.sighting = Some(sighting);
        sighting
    }

    /// Asks perception directly, bypassing the per-tick cache.
    pub fn visible_player(&self) -> Option<Vec3> {
        let player = self.player_position?;
        let from = self.position()?;
        self.perception
            .can_see(self.agent, from, player)
            .then_some(player)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Walks the focused agent toward `target`.
    ///
    /// Returns `Success` once within stopping distance (movement is stopped),
    /// `InProgress` after handing the target to the navigator, and `Failure`
    /// if the agent no longer exists.
    pub fn walk_to(&mut self, target: Vec3) -> Status {
        let Some(position) = self.position() else {
            return Status::Failure;
        };
        if position.distance(target) <= self.navigator.stopping_distance() {
            self.navigator.stop(self.agent);
            Status::Success
        } else {
            self.navigator.move_to(self.agent, target);
            Status::InProgress
        }
    }

    pub fn stop(&mut self) {
        self.navigator.stop(self.agent);
    }

    // ========================================================================
    // Blackboard
    // ========================================================================

    pub fn rally_point(&self) -> Option<Vec3> {
        self.rally_point
    }

    pub fn set_rally_point(&mut self, rally_point: Vec3) {
        self.rally_point = Some(rally_point);
    }

    pub fn roam_target(&self) -> Option<Vec3> {
        self.roam_targets.get(&self.agent).copied()
    }

    pub fn set_roam_target(&mut self, target: Vec3) {
        self.roam_targets.insert(self.agent, target);
    }

    pub fn clear_roam_target(&mut self) {
        self.roam_targets.remove(&self.agent);
    }

    /// Uniform random point on the ground plane within the roam radius.
    pub fn random_point_around(&mut self, center: Vec3) -> Vec3 {
        if self.roam_radius <= 0.0 {
            return center;
        }
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = self.roam_radius * self.rng.gen_range(0.0f32..=1.0).sqrt();
        center + Vec3::new(angle.cos(), 0.0, angle.sin()) * distance
    }

    /// Drops per-agent memory for a despawned agent.
    pub fn forget(&mut self, agent: AgentId) {
        self.roam_targets.remove(&agent);
    }

    // ========================================================================
    // Events
    // ========================================================================

    pub fn publish(&self, event: impl Into<Event>) {
        self.events.publish(event);
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
