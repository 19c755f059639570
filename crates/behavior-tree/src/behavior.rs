//! Core behavior trait.
//!
//! This module defines the [`Behavior`] trait, which is the fundamental
//! abstraction for all behavior tree nodes. The trait is generic over a
//! context type `C` (the blackboard), allowing nodes to read and mutate the
//! state they coordinate.

use crate::Status;

/// A behavior tree node that can be evaluated against a context.
pub trait Behavior<C>: Send + Sync {
    /// Evaluate this behavior node against the given context.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Mutable reference to the context/blackboard. Nodes can read
    ///   shared state and modify it (e.g., to join a horde).
    ///
    /// # Returns
    ///
    /// - `Status::Success` if the behavior succeeded
    /// - `Status::Failure` if the behavior failed
    /// - `Status::InProgress` if the behavior is waiting on the host this frame
    fn tick(&self, ctx: &mut C) -> Status;
}

/// Blanket implementation for boxed behaviors.
///
/// This allows `Box<dyn Behavior<C>>` to also implement `Behavior<C>`,
/// enabling dynamic dispatch and heterogeneous collections of nodes.
impl<C> Behavior<C> for Box<dyn Behavior<C>> {
    #[inline]
    fn tick(&self, ctx: &mut C) -> Status {
        (**self).tick(ctx)
    }
}
