//! Frame driver.
//!
//! The [`Coordinator`] owns the coordination context and one behavior tree
//! per archetype, and ticks every live agent once per frame in ascending id
//! order. Membership changes apply immediately, so an agent evaluated later
//! in a frame sees the joins made earlier in the same frame.

use std::collections::BTreeMap;

use behavior_tree::{Behavior, Status};
use horde_core::{AgentId, AgentState, Horde, HordeConfig, HordeId, HordeManager, Vec3};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use crate::api::{Clock, ManualClock, Navigator, Perception, Result, RuntimeError};
use crate::events::{Event, EventBus, HordeEvent, Topic};
use crate::providers::ai::{AiContext, Archetype, BehaviorTree};

/// Coordinator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Disband a horde as soon as its last member leaves.
    pub disband_empty_hordes: bool,
    /// Buffered events per topic before slow subscribers start lagging.
    pub event_capacity: usize,
    /// Radius of the random walk used by unassigned agents.
    pub roam_radius: f32,
    /// Seed for roaming targets.
    pub rng_seed: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            disband_empty_hordes: false,
            event_capacity: 256,
            roam_radius: 10.0,
            rng_seed: 0,
        }
    }
}

/// Outcome of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub now: f64,
    /// Root status per agent, in tick order.
    pub statuses: Vec<(AgentId, Status)>,
}

impl FrameReport {
    pub fn status_of(&self, agent: AgentId) -> Option<Status> {
        self.statuses
            .iter()
            .find(|(id, _)| *id == agent)
            .map(|(_, status)| *status)
    }

    pub fn count(&self, status: Status) -> usize {
        self.statuses.iter().filter(|(_, s)| *s == status).count()
    }
}

pub struct Coordinator {
    ctx: AiContext,
    trees: BTreeMap<Archetype, BehaviorTree>,
    archetypes: BTreeMap<AgentId, Archetype>,
    clock: Box<dyn Clock>,
    frame: u64,
}

impl Coordinator {
    /// Create a new coordinator builder
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    // ========================================================================
    // Agent lifecycle
    // ========================================================================

    /// Registers an agent driven by the tree of `archetype`.
    pub fn spawn_agent(
        &mut self,
        id: AgentId,
        position: Vec3,
        config: HordeConfig,
        archetype: Archetype,
    ) -> Result<()> {
        config
            .validate()
            .map_err(|source| RuntimeError::InvalidConfig { agent: id, source })?;
        if !self.trees.contains_key(&archetype) {
            return Err(RuntimeError::MissingTree(archetype));
        }

        if self.ctx.manager().agents().contains(id) {
            self.despawn_agent(id)?;
        }
        self.ctx.manager_mut().spawn_agent(id, position, config);
        self.archetypes.insert(id, archetype);
        Ok(())
    }

    /// Removes an agent, evicting it from its horde.
    pub fn despawn_agent(&mut self, id: AgentId) -> Result<AgentState> {
        let now = self.clock.now();
        let left = self.ctx.manager_mut().leave_horde(id)?;
        let agent = self.ctx.manager_mut().remove_agent(id)?;
        self.archetypes.remove(&id);
        self.ctx.forget(id);
        self.ctx.focus(id, now);
        self.ctx.stop();

        if let Some(horde) = left {
            self.ctx.publish(HordeEvent::Left {
                agent: id,
                horde,
                at: now,
            });
            if self.ctx.manager().horde(horde).is_err() {
                self.ctx.publish(HordeEvent::Disbanded { horde, at: now });
            }
        }
        Ok(agent)
    }

    /// Disbands a horde, releasing every member.
    pub fn disband_horde(&mut self, id: HordeId) -> Result<Horde> {
        let now = self.clock.now();
        let horde = self.ctx.manager_mut().disband_horde(id)?;
        for member in horde.members() {
            self.ctx.publish(HordeEvent::Left {
                agent: member,
                horde: id,
                at: now,
            });
        }
        self.ctx.publish(HordeEvent::Disbanded { horde: id, at: now });
        Ok(horde)
    }

    /// Forwards an agent position reported by the world simulation.
    pub fn set_agent_position(&mut self, id: AgentId, position: Vec3) -> Result<()> {
        Ok(self.ctx.manager_mut().set_position(id, position)?)
    }

    /// Player location for this frame; `None` when the player is absent.
    pub fn set_player_position(&mut self, position: Option<Vec3>) {
        self.ctx.set_player_position(position);
    }

    // ========================================================================
    // Ticking
    // ========================================================================

    /// Runs one frame at the clock's current time.
    pub fn run_frame(&mut self) -> FrameReport {
        let now = self.clock.now();
        self.run_frame_at(now)
    }

    /// Ticks every live agent once, in ascending id order.
    pub fn run_frame_at(&mut self, now: f64) -> FrameReport {
        let ids: Vec<AgentId> = self.ctx.manager().agents().ids().collect();
        let mut statuses = Vec::with_capacity(ids.len());

        for id in ids {
            let status = match self.tick_agent(id, now) {
                Ok(status) => status,
                Err(err) => {
                    tracing::warn!(agent = %id, "tick failed: {err}");
                    Status::Failure
                }
            };
            statuses.push((id, status));
        }

        #[cfg(debug_assertions)]
        if let Err(err) = self.ctx.manager().check_membership() {
            tracing::warn!(frame = self.frame, "{err}");
        }

        let report = FrameReport {
            frame: self.frame,
            now,
            statuses,
        };
        tracing::debug!(
            frame = report.frame,
            agents = report.statuses.len(),
            hordes = self.ctx.manager().hordes().len(),
            in_progress = report.count(Status::InProgress),
            failed = report.count(Status::Failure),
            "frame complete"
        );
        self.frame += 1;
        report
    }

    /// Ticks a single agent with its archetype's tree.
    pub fn tick_agent(&mut self, id: AgentId, now: f64) -> Result<Status> {
        let archetype = self
            .archetypes
            .get(&id)
            .copied()
            .ok_or(horde_core::HordeError::AgentNotFound(id))?;
        let tree = self
            .trees
            .get(&archetype)
            .ok_or(RuntimeError::MissingTree(archetype))?;

        self.ctx.focus(id, now);
        let status = tree.tick(&mut self.ctx);
        tracing::trace!(agent = %id, %archetype, ?status, "ticked");
        Ok(status)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn manager(&self) -> &HordeManager {
        self.ctx.manager()
    }

    pub fn archetype(&self, id: AgentId) -> Option<Archetype> {
        self.archetypes.get(&id).copied()
    }

    pub fn events(&self) -> &EventBus {
        self.ctx.events()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.ctx.events().subscribe(topic)
    }

    /// Index of the next frame to run.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

/// Builder for [`Coordinator`].
///
/// Perception and navigation are mandatory. The clock defaults to a
/// [`ManualClock`] at zero (useful with [`Coordinator::run_frame_at`]) and
/// every archetype gets its preset tree unless overridden.
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
    perception: Option<Box<dyn Perception>>,
    navigator: Option<Box<dyn Navigator>>,
    clock: Option<Box<dyn Clock>>,
    events: Option<EventBus>,
    trees: BTreeMap<Archetype, BehaviorTree>,
}

impl CoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig::default(),
            perception: None,
            navigator: None,
            clock: None,
            events: None,
            trees: BTreeMap::new(),
        }
    }

    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn perception(mut self, perception: impl Perception + 'static) -> Self {
        self.perception = Some(Box::new(perception));
        self
    }

    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Shares an existing bus instead of creating one.
    pub fn events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Overrides the preset tree of `archetype`.
    pub fn tree(mut self, archetype: Archetype, tree: BehaviorTree) -> Self {
        self.trees.insert(archetype, tree);
        self
    }

    pub fn build(self) -> Result<Coordinator> {
        let perception = self
            .perception
            .ok_or(RuntimeError::MissingCollaborator("perception"))?;
        let navigator = self
            .navigator
            .ok_or(RuntimeError::MissingCollaborator("navigator"))?;
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(ManualClock::new(0.0)));
        let events = self
            .events
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_capacity));

        let mut trees = self.trees;
        for archetype in Archetype::iter() {
            trees.entry(archetype).or_insert_with(|| archetype.tree());
        }

        let manager = HordeManager::new().with_disband_empty(self.config.disband_empty_hordes);
        let ctx = AiContext::new(manager, perception, navigator, events)
            .with_rng_seed(self.config.rng_seed)
            .with_roam_radius(self.config.roam_radius);

        tracing::info!(
            disband_empty_hordes = self.config.disband_empty_hordes,
            roam_radius = self.config.roam_radius,
            "coordinator built"
        );

        Ok(Coordinator {
            ctx,
            trees,
            archetypes: BTreeMap::new(),
            clock,
            frame: 0,
        })
    }
}

impl Default for CoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
