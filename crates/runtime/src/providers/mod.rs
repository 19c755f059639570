//! Decision-making implementations for coordinated agents.

pub mod ai;
