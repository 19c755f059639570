//! Condition nodes for horde behavior trees.
//!
//! Conditions inspect coordination state and return Success or Failure.
//! Apart from [`CanSeePlayer`], which refreshes the sighting cache, they do
//! not modify state.

use behavior_tree::{Behavior, Status};

use crate::events::PerceptionEvent;
use crate::providers::ai::AiContext;

/// Succeeds if the agent currently belongs to a horde.
pub struct HasHorde;

impl Behavior<AiContext> for HasHorde {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let assigned = ctx
            .agent_state()
            .is_some_and(|agent| agent.horde().is_some());
        Status::from_bool(assigned)
    }
}

/// Succeeds once the agent's horde check interval has elapsed.
///
/// The interval is clamped to at least 0.1 s; an agent that has never
/// checked is always due.
///
/// # Example
///
/// ```rust,ignore
/// // Only coordinate when due, and remember that we tried.
/// Sequence::new(vec![
///     Box::new(IsHordeCheckDue),
///     Box::new(RecordHordeCheck),
///     Box::new(JoinNearestHorde),
/// ])
/// ```
pub struct IsHordeCheckDue;

impl Behavior<AiContext> for IsHordeCheckDue {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let now = ctx.now;
        let due = ctx.agent_state().is_some_and(|agent| agent.is_check_due(now));
        Status::from_bool(due)
    }
}

/// Succeeds if the agent is the lowest-id member of its horde.
pub struct IsHordeLeader;

impl Behavior<AiContext> for IsHordeLeader {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let agent = ctx.agent;
        let Some(horde_id) = ctx.agent_state().and_then(|state| state.horde()) else {
            return Status::Failure;
        };
        let leads = ctx
            .manager()
            .horde(horde_id)
            .is_ok_and(|horde| horde.leader() == Some(agent));
        Status::from_bool(leads)
    }
}

/// Checks whether the player is visible and refreshes the sighting cache.
///
/// Line of sight is delegated to the host's `Perception`. On every tick the
/// agent's `sees_player` flag is updated; `player_position` keeps the last
/// place the player was seen. Transitions publish
/// [`PerceptionEvent::PlayerSpotted`] / [`PerceptionEvent::PlayerLost`].
pub struct CanSeePlayer;

impl Behavior<AiContext> for CanSeePlayer {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let (agent, now) = (ctx.agent, ctx.now);
        let visible = ctx.sight_player();
        let Some(state) = ctx.agent_state_mut() else {
            return Status::Failure;
        };
        let was_seeing = state.sees_player;
        state.sees_player = visible.is_some();
        if visible.is_some() {
            state.player_position = visible;
        }

        match (was_seeing, visible) {
            (false, Some(player_position)) => {
                tracing::debug!(%agent, ?player_position, "player spotted");
                ctx.publish(PerceptionEvent::PlayerSpotted {
                    agent,
                    player_position,
                    at: now,
                });
            }
            (true, None) => {
                tracing::debug!(%agent, "player lost");
                ctx.publish(PerceptionEvent::PlayerLost { agent, at: now });
            }
            _ => {}
        }

        Status::from_bool(visible.is_some())
    }
}
