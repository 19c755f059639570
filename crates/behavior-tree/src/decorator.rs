//! Decorator behavior nodes.
//!
//! Decorators wrap a single child behavior and modify its result or execution.
//! This module provides [`Inverter`] (NOT logic) and [`AlwaysSucceed`] (error suppression).

use crate::{Behavior, Status};

/// Inverts the result of its child behavior.
///
/// # Semantics
///
/// - If the child returns `Success`, the inverter returns `Failure`
/// - If the child returns `Failure`, the inverter returns `Success`
/// - `InProgress` passes through unchanged
///
/// This is analogous to a logical NOT (!) operation.
pub struct Inverter<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> Inverter<C> {
    /// Creates a new inverter that wraps the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for Inverter<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        self.child.tick(ctx).invert()
    }
}

/// Returns `Success` whenever the child has finished, regardless of outcome.
///
/// # Semantics
///
/// - If the child returns `Success`, returns `Success`
/// - If the child returns `Failure`, **still returns `Success`**
/// - If the child returns `InProgress`, returns `InProgress`
///
/// This is useful for optional side effects (bookkeeping, perception caching)
/// that shouldn't cause a sequence to fail.
pub struct AlwaysSucceed<C> {
    child: Box<dyn Behavior<C>>,
}

impl<C> AlwaysSucceed<C> {
    /// Creates a new always-succeed wrapper around the given child behavior.
    pub fn new(child: Box<dyn Behavior<C>>) -> Self {
        Self { child }
    }
}

impl<C> Behavior<C> for AlwaysSucceed<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        match self.child.tick(ctx) {
            Status::InProgress => Status::InProgress,
            _ => Status::Success,
        }
    }
}
