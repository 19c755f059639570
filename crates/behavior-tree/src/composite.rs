//! Composite behavior nodes.
//!
//! Composite nodes control the execution flow of multiple child behaviors.
//! This module provides the fundamental building blocks for creating complex
//! decision trees: [`Sequence`] (AND logic) and [`Selector`] (OR logic).

use crate::{Behavior, Status};

/// Executes child behaviors in sequence until one fails.
///
/// # Semantics
///
/// A `Sequence` node evaluates its children from left to right:
/// - If a child returns `Failure`, the sequence **stops immediately** and returns `Failure`
/// - If a child returns `InProgress`, the sequence **stops immediately** and returns `InProgress`
/// - If a child returns `Success`, the sequence **continues** to the next child
/// - If all children return `Success`, the sequence returns `Success`
///
/// This is analogous to a short-circuited logical AND (&&) operation.
pub struct Sequence<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Sequence<C> {
    /// Creates a new sequence with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A sequence with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Sequence must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Sequence<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            match child.tick(ctx) {
                Status::Success => continue,
                other => return other,
            }
        }
        Status::Success
    }
}

/// Executes child behaviors in sequence until one succeeds.
///
/// # Semantics
///
/// A `Selector` node evaluates its children from left to right:
/// - If a child returns `Success`, the selector **stops immediately** and returns `Success`
/// - If a child returns `InProgress`, the selector **stops immediately** and returns `InProgress`
/// - If a child returns `Failure`, the selector **continues** to the next child
/// - If all children return `Failure`, the selector returns `Failure`
///
/// This is analogous to a short-circuited logical OR (||) operation.
pub struct Selector<C> {
    children: Vec<Box<dyn Behavior<C>>>,
}

impl<C> Selector<C> {
    /// Creates a new selector with the given child behaviors.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A selector with no children is
    /// meaningless and likely indicates a programming error.
    pub fn new(children: Vec<Box<dyn Behavior<C>>>) -> Self {
        assert!(
            !children.is_empty(),
            "Selector must have at least one child"
        );
        Self { children }
    }
}

impl<C> Behavior<C> for Selector<C> {
    fn tick(&self, ctx: &mut C) -> Status {
        for child in &self.children {
            match child.tick(ctx) {
                Status::Failure => continue,
                other => return other,
            }
        }
        Status::Failure
    }
}
