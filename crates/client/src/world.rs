//! Minimal world simulation standing in for a game engine.
//!
//! Agents walk in straight lines toward whatever the coordinator last asked
//! for, and see the player within a fixed range. Positions are written back
//! into the coordinator after every frame.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use horde_core::{AgentId, HordeManager, Vec3};
use runtime::{
    Coordinator, FrameReport, ManualClock, Navigator, Perception, PlayerPath, Scenario,
};

/// Sees the player within `range`, ignoring obstacles.
pub struct RangePerception {
    pub range: f32,
}

impl Perception for RangePerception {
    fn can_see(&self, _agent: AgentId, from: Vec3, player: Vec3) -> bool {
        from.distance(player) <= self.range
    }
}

/// Straight-line movement at constant speed.
#[derive(Debug, Default)]
pub struct KinematicNavigator {
    speed: f32,
    targets: BTreeMap<AgentId, Vec3>,
}

impl KinematicNavigator {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            targets: BTreeMap::new(),
        }
    }

    /// Positions after walking `dt` seconds toward each pending target.
    pub fn step(&self, manager: &HordeManager, dt: f32) -> Vec<(AgentId, Vec3)> {
        let max_step = self.speed * dt;
        self.targets
            .iter()
            .filter_map(|(id, target)| {
                let position = manager.agents().position(*id)?;
                let offset = *target - position;
                let distance = offset.length();
                if distance <= f32::EPSILON {
                    return None;
                }
                let next = if distance <= max_step {
                    *target
                } else {
                    position + offset / distance * max_step
                };
                Some((*id, next))
            })
            .collect()
    }
}

impl Navigator for KinematicNavigator {
    fn move_to(&mut self, agent: AgentId, target: Vec3) {
        self.targets.insert(agent, target);
    }

    fn stop(&mut self, agent: AgentId) {
        self.targets.remove(&agent);
    }
}

/// A scenario running against the kinematic world.
pub struct Simulation {
    coordinator: Coordinator,
    navigator: Rc<RefCell<KinematicNavigator>>,
    clock: ManualClock,
    player: PlayerPath,
    frame_dt: f64,
}

impl Simulation {
    pub fn new(scenario: &Scenario, agent_speed: f32, frame_dt: f64) -> runtime::Result<Self> {
        let navigator = Rc::new(RefCell::new(KinematicNavigator::new(agent_speed)));
        let clock = ManualClock::new(0.0);

        let mut coordinator = Coordinator::builder()
            .config(scenario.coordinator.clone())
            .perception(RangePerception {
                range: scenario.sight_range,
            })
            .navigator(navigator.clone())
            .clock(clock.clone())
            .build()?;
        scenario.spawn_into(&mut coordinator)?;

        Ok(Self {
            coordinator,
            navigator,
            clock,
            player: scenario.player.clone(),
            frame_dt,
        })
    }

    /// Runs one frame, then moves agents for the frame's duration.
    pub fn step(&mut self) -> runtime::Result<FrameReport> {
        let now = self.coordinator.now();
        self.coordinator
            .set_player_position(self.player.position_at(now));

        let report = self.coordinator.run_frame();

        let moves = self
            .navigator
            .borrow()
            .step(self.coordinator.manager(), self.frame_dt as f32);
        for (agent, position) in moves {
            self.coordinator.set_agent_position(agent, position)?;
        }

        self.clock.advance(self.frame_dt);
        Ok(report)
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }
}
