//! Layer 3: Complete trees per agent archetype.
//!
//! Each preset handles every situation with a fallback, so a tick always
//! ends in an observable status.
//!
//! ```text
//! horde_grunt()
//!   └─ Sequence
//!       ├─ tactics::stay_grouped()           ← never fails
//!       └─ Selector
//!           ├─ tactics::horde_advance()
//!           │   ├─ patterns::chase_player()
//!           │   └─ patterns::follow_horde()
//!           ├─ patterns::roam_when_alone()
//!           └─ patterns::hold_fallback()
//! ```

use behavior_tree::builder::{selector, sequence};

use super::BehaviorTree;
use super::subtrees::{patterns, tactics};

/// Horde grunt: groups up whenever possible.
///
/// # Behavior
///
/// 1. Coordinate horde membership (when the check interval allows)
/// 2. Chase the player on sight; a leader drags the rally point along
/// 3. Otherwise walk to the horde's rally point
/// 4. Roam if no horde could be found
/// 5. Hold position as a last resort
pub fn horde_grunt() -> BehaviorTree {
    sequence(vec![
        tactics::stay_grouped(),
        selector(vec![
            tactics::horde_advance(),
            patterns::roam_when_alone(),
            patterns::hold_fallback(),
        ]),
    ])
}

/// Lone stalker: hunts on its own and never joins a horde.
///
/// Lone stalkers still count as unassigned agents, so a grunt standing
/// next to them may found a horde they will never join.
pub fn lone_stalker() -> BehaviorTree {
    selector(vec![
        patterns::chase_player(),
        patterns::roam_when_alone(),
        patterns::hold_fallback(),
    ])
}

/// Training dummy: tracks the player but never moves.
pub fn dummy() -> BehaviorTree {
    sequence(vec![tactics::keep_watch(), patterns::hold_fallback()])
}
