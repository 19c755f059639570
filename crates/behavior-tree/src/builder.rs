//! Shorthand constructors for assembling trees.
//!
//! Trees are built from boxed nodes; these helpers hide the boxing so that
//! subtree definitions read as nested calls:
//!
//! ```rust
//! use behavior_tree::builder::{node, selector, sequence};
//! use behavior_tree::{Behavior, Status};
//!
//! struct Ready;
//! impl Behavior<u32> for Ready {
//!     fn tick(&self, ctx: &mut u32) -> Status {
//!         Status::from_bool(*ctx > 0)
//!     }
//! }
//!
//! struct Spend;
//! impl Behavior<u32> for Spend {
//!     fn tick(&self, ctx: &mut u32) -> Status {
//!         *ctx -= 1;
//!         Status::Success
//!     }
//! }
//!
//! let tree = selector(vec![sequence(vec![node(Ready), node(Spend)]), node(Ready)]);
//! let mut budget = 1;
//! assert!(tree.tick(&mut budget).is_success());
//! assert_eq!(budget, 0);
//! ```

use crate::{AlwaysSucceed, Behavior, Inverter, Selector, Sequence};

/// Boxes a leaf node.
#[inline]
pub fn node<C, B>(behavior: B) -> Box<dyn Behavior<C>>
where
    B: Behavior<C> + 'static,
{
    Box::new(behavior)
}

/// Boxed [`Sequence`].
#[inline]
pub fn sequence<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Sequence::new(children))
}

/// Boxed [`Selector`].
#[inline]
pub fn selector<C: 'static>(children: Vec<Box<dyn Behavior<C>>>) -> Box<dyn Behavior<C>> {
    Box::new(Selector::new(children))
}

/// Boxed [`Inverter`].
#[inline]
pub fn inverter<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(Inverter::new(child))
}

/// Boxed [`AlwaysSucceed`].
#[inline]
pub fn always_succeed<C: 'static>(child: Box<dyn Behavior<C>>) -> Box<dyn Behavior<C>> {
    Box::new(AlwaysSucceed::new(child))
}
