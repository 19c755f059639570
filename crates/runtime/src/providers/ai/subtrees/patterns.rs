//! Layer 1: Basic patterns.
//!
//! Patterns follow the `action_when_condition()` naming where a guard is
//! involved; `coordinate_horde()` is the one multi-step decision at this
//! layer because its four outcomes only make sense together.

use behavior_tree::builder::{always_succeed, inverter, node, selector, sequence};

use crate::providers::ai::nodes::{
    CanSeePlayer, FoundHorde, HasHorde, Hold, IsHordeCheckDue, IsHordeLeader, JoinNearestHorde,
    MarkAlone, MoveRallyPointToPlayer, MoveToRallyPoint, MoveTowardPlayer, RecordHordeCheck, Roam,
    SyncHordeState,
};

use super::BehaviorTree;

// ============================================================================
// Coordination Patterns
// ============================================================================

/// One horde-coordination attempt, gated by the agent's check interval.
///
/// 1. Already in a horde → Success (blackboard synchronized)
/// 2. A joinable horde is in range → join it, Success
/// 3. Enough unassigned agents nearby → found a horde, Success
/// 4. Otherwise → mark alone, Failure
///
/// Returns Failure without doing anything when the check is not due.
pub fn coordinate_horde() -> BehaviorTree {
    sequence(vec![
        node(IsHordeCheckDue),
        node(RecordHordeCheck),
        selector(vec![
            node(SyncHordeState),
            node(JoinNearestHorde),
            node(FoundHorde),
            node(MarkAlone),
        ]),
    ])
}

/// Leader-only: move the horde's rally point onto the player.
pub fn lead_horde_when_leader() -> BehaviorTree {
    sequence(vec![node(IsHordeLeader), node(MoveRallyPointToPlayer)])
}

// ============================================================================
// Movement Patterns
// ============================================================================

/// Chase the player when visible, pulling the horde along when leading it.
pub fn chase_player() -> BehaviorTree {
    sequence(vec![
        node(CanSeePlayer),
        always_succeed(lead_horde_when_leader()),
        node(MoveTowardPlayer),
    ])
}

/// Walk to the horde's rally point when in a horde.
pub fn follow_horde() -> BehaviorTree {
    sequence(vec![node(SyncHordeState), node(MoveToRallyPoint)])
}

/// Roam when not in a horde.
pub fn roam_when_alone() -> BehaviorTree {
    sequence(vec![inverter(node(HasHorde)), node(Roam)])
}

// ============================================================================
// Fallback Patterns
// ============================================================================

/// Stand still. Always succeeds, so it belongs last in a selector.
pub fn hold_fallback() -> BehaviorTree {
    node(Hold)
}
