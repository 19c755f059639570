//! Test doubles for the host collaborators.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use horde_core::{AgentId, HordeConfig, HordeManager, Vec3};
use runtime::{AiContext, EventBus, Event, Navigator, Perception};
use tokio::sync::broadcast::Receiver;

/// Sees the player within a fixed distance.
pub struct Sight {
    pub range: f32,
}

impl Sight {
    pub fn blind() -> Self {
        Self { range: -1.0 }
    }

    pub fn unlimited() -> Self {
        Self { range: f32::MAX }
    }
}

impl Perception for Sight {
    fn can_see(&self, _agent: AgentId, from: Vec3, player: Vec3) -> bool {
        from.distance(player) <= self.range
    }
}

/// Remembers the last movement request per agent.
#[derive(Default)]
pub struct RecordingNavigator {
    pub targets: BTreeMap<AgentId, Vec3>,
    pub stops: Vec<AgentId>,
}

impl Navigator for RecordingNavigator {
    fn move_to(&mut self, agent: AgentId, target: Vec3) {
        self.targets.insert(agent, target);
    }

    fn stop(&mut self, agent: AgentId) {
        self.targets.remove(&agent);
        self.stops.push(agent);
    }
}

pub type SharedNavigator = Rc<RefCell<RecordingNavigator>>;

pub fn navigator() -> SharedNavigator {
    Rc::new(RefCell::new(RecordingNavigator::default()))
}

/// Context over `manager` with a recording navigator and the given sight.
pub fn context(manager: HordeManager, sight: Sight) -> (AiContext, SharedNavigator) {
    let nav = navigator();
    let ctx = AiContext::new(
        manager,
        Box::new(sight),
        Box::new(nav.clone()),
        EventBus::new(),
    );
    (ctx, nav)
}

pub fn config(horde_max: usize, horde_min_size: usize, join_radius: f32) -> HordeConfig {
    HordeConfig::new()
        .with_horde_max(horde_max)
        .with_horde_min_size(horde_min_size)
        .with_join_radius(join_radius)
}

/// Drains everything currently buffered on a receiver.
pub fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
