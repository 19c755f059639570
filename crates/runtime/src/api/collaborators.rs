//! Host-side collaborators.
//!
//! The coordinator never computes paths, line of sight or wall-clock time
//! itself. Hosts plug those in through the traits below; shared handles
//! (`Rc<RefCell<_>>`) forward to the inner implementation so the host can keep
//! a reference to the same object it handed over.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use horde_core::{AgentId, Vec3};

/// Line-of-sight check supplied by the host.
pub trait Perception {
    /// Returns whether `agent`, standing at `from`, can see the player at
    /// `player`.
    fn can_see(&self, agent: AgentId, from: Vec3, player: Vec3) -> bool;
}

/// Navigation subsystem accepting movement requests.
pub trait Navigator {
    /// Requests that `agent` walks to `target`. Re-issuing the same request
    /// every frame must be harmless.
    fn move_to(&mut self, agent: AgentId, target: Vec3);

    /// Cancels any pending movement for `agent`.
    fn stop(&mut self, agent: AgentId);

    /// Distance under which a target counts as reached.
    fn stopping_distance(&self) -> f32 {
        1.0
    }
}

/// Monotonic time source, in seconds.
pub trait Clock {
    fn now(&self) -> f64;
}

impl<P: Perception + ?Sized> Perception for Rc<RefCell<P>> {
    fn can_see(&self, agent: AgentId, from: Vec3, player: Vec3) -> bool {
        self.borrow().can_see(agent, from, player)
    }
}

impl<N: Navigator + ?Sized> Navigator for Rc<RefCell<N>> {
    fn move_to(&mut self, agent: AgentId, target: Vec3) {
        self.borrow_mut().move_to(agent, target);
    }

    fn stop(&mut self, agent: AgentId) {
        self.borrow_mut().stop(agent);
    }

    fn stopping_distance(&self) -> f32 {
        self.borrow().stopping_distance()
    }
}

/// Clock advanced explicitly by the host (or a test).
///
/// Clones share the same time, so one copy can be handed to the coordinator
/// while another is advanced by the frame loop.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    seconds: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            seconds: Rc::new(Cell::new(start)),
        }
    }

    /// Moves time forward. Negative steps are ignored to keep time monotonic.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.seconds.set(self.seconds.get() + seconds);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.seconds.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_and_monotonic() {
        let clock = ManualClock::new(1.0);
        let handle = clock.clone();

        handle.advance(0.5);
        handle.advance(-3.0);

        assert_eq!(clock.now(), 1.5);
    }
}
