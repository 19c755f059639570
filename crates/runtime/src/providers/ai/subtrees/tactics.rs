//! Layer 2: Goal-oriented tactics.
//!
//! Each tactic answers "how do I accomplish X?" by combining patterns.

use behavior_tree::builder::{always_succeed, node, selector};

use crate::providers::ai::nodes::{CanSeePlayer, SyncHordeState};

use super::{BehaviorTree, patterns};

/// Keep horde membership up to date without ever failing the caller.
///
/// Runs a coordination attempt when due and otherwise just re-synchronizes
/// the blackboard, so movement nodes later in the frame see the current
/// rally point either way.
pub fn stay_grouped() -> BehaviorTree {
    always_succeed(selector(vec![
        patterns::coordinate_horde(),
        node(SyncHordeState),
    ]))
}

/// Advance as a group: chase on sight, otherwise converge on the rally point.
pub fn horde_advance() -> BehaviorTree {
    selector(vec![patterns::chase_player(), patterns::follow_horde()])
}

/// Refresh the sighting cache without affecting control flow.
pub fn keep_watch() -> BehaviorTree {
    always_succeed(node(CanSeePlayer))
}
