//! Action nodes for horde behavior trees.
//!
//! Horde actions mutate coordination state through the manager held by the
//! context; movement actions hand targets to the host navigator and report
//! `InProgress` until the target is reached.

use behavior_tree::{Behavior, Status};
use horde_core::HordeError;

use super::report;
use crate::events::HordeEvent;
use crate::providers::ai::AiContext;

/// Stamps the current time as the agent's last horde check.
///
/// Placed right after [`super::IsHordeCheckDue`] so that every attempt that
/// passed the gate is recorded, whatever its outcome.
pub struct RecordHordeCheck;

impl Behavior<AiContext> for RecordHordeCheck {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let now = ctx.now;
        match ctx.agent_state_mut() {
            Some(agent) => {
                agent.last_horde_check = Some(now);
                Status::Success
            }
            None => Status::Failure,
        }
    }
}

/// Succeeds if the agent already has a horde, synchronizing the blackboard.
///
/// The horde's rally point is cached for movement nodes and the `alone` flag
/// is cleared. Calling this repeatedly never changes membership.
pub struct SyncHordeState;

impl Behavior<AiContext> for SyncHordeState {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let agent = ctx.agent;
        let Some(horde_id) = ctx.agent_state().and_then(|state| state.horde()) else {
            return Status::Failure;
        };
        let rally_point = match ctx.manager().horde(horde_id) {
            Ok(horde) => horde.rally_point,
            Err(err) => {
                report(agent, &err);
                return Status::Failure;
            }
        };

        ctx.set_rally_point(rally_point);
        if let Some(state) = ctx.agent_state_mut() {
            state.alone = false;
        }
        Status::Success
    }
}

/// Joins the closest horde with room whose rally point is within the agent's
/// join radius.
///
/// Fails if the agent is already assigned, or if no horde qualifies.
pub struct JoinNearestHorde;

impl Behavior<AiContext> for JoinNearestHorde {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let (agent, now) = (ctx.agent, ctx.now);
        let Some(state) = ctx.agent_state() else {
            return Status::Failure;
        };
        if !state.is_unassigned() {
            return Status::Failure;
        }
        let (position, radius) = (state.position, state.config.join_radius);

        let Some((horde_id, rally_point)) = ctx
            .manager()
            .nearest_joinable_horde(position, radius)
            .map(|horde| (horde.id, horde.rally_point))
        else {
            return Status::Failure;
        };

        if let Err(err) = ctx.manager_mut().join_horde(agent, horde_id) {
            report(agent, &err);
            return Status::Failure;
        }

        tracing::debug!(%agent, horde = %horde_id, "joined nearest horde");
        ctx.publish(HordeEvent::Joined {
            agent,
            horde: horde_id,
            at: now,
        });
        ctx.set_rally_point(rally_point);
        if let Some(state) = ctx.agent_state_mut() {
            state.alone = false;
        }
        Status::Success
    }
}

/// Founds a new horde at the agent's position when enough unassigned agents
/// (the founder included) are within its join radius.
///
/// The horde gets the founder's `horde_max` as capacity and the founder as
/// its first member.
pub struct FoundHorde;

impl Behavior<AiContext> for FoundHorde {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let (agent, now) = (ctx.agent, ctx.now);
        let Some(state) = ctx.agent_state() else {
            return Status::Failure;
        };
        if !state.is_unassigned() {
            return Status::Failure;
        }
        let (position, config) = (state.position, state.config);

        let nearby = ctx
            .manager()
            .count_unassigned_nearby(position, config.join_radius);
        if nearby < config.horde_min_size {
            tracing::trace!(%agent, nearby, required = config.horde_min_size, "too few to found a horde");
            report(agent, &HordeError::NoCandidate { agent });
            return Status::Failure;
        }

        let horde_id = match ctx.manager_mut().create_horde(position, config.horde_max) {
            Ok(id) => id,
            Err(err) => {
                report(agent, &err);
                return Status::Failure;
            }
        };
        if let Err(err) = ctx.manager_mut().join_horde(agent, horde_id) {
            report(agent, &err);
            // Nobody else knows about the horde yet.
            let _ = ctx.manager_mut().disband_horde(horde_id);
            return Status::Failure;
        }

        tracing::info!(%agent, horde = %horde_id, nearby, "founded horde");
        ctx.publish(HordeEvent::Created {
            horde: horde_id,
            founder: agent,
            rally_point: position,
            at: now,
        });
        ctx.publish(HordeEvent::Joined {
            agent,
            horde: horde_id,
            at: now,
        });
        ctx.set_rally_point(position);
        if let Some(state) = ctx.agent_state_mut() {
            state.alone = false;
        }
        Status::Success
    }
}

/// Flags the agent as alone and fails.
///
/// This is the last option of the coordination selector: the failure tells
/// the caller to fall back to independent behavior (roaming).
pub struct MarkAlone;

impl Behavior<AiContext> for MarkAlone {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let (agent, now) = (ctx.agent, ctx.now);
        let Some(state) = ctx.agent_state_mut() else {
            return Status::Failure;
        };
        let newly_alone = !state.alone;
        state.alone = true;

        if newly_alone {
            tracing::debug!(%agent, "no horde available, going alone");
            ctx.publish(HordeEvent::Alone { agent, at: now });
        }
        Status::Failure
    }
}

/// Chases the player while perception reports it visible.
///
/// Reuses the sighting made earlier in the tick (by [`super::CanSeePlayer`])
/// and hands the player's position to navigation. Returns `InProgress` while
/// closing in, `Success` once within stopping distance, `Failure` when the
/// player is not visible.
pub struct MoveTowardPlayer;

impl Behavior<AiContext> for MoveTowardPlayer {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let Some(player) = ctx.sight_player() else {
            if let Some(state) = ctx.agent_state_mut() {
                state.sees_player = false;
            }
            return Status::Failure;
        };

        if let Some(state) = ctx.agent_state_mut() {
            state.sees_player = true;
            state.player_position = Some(player);
        }
        ctx.walk_to(player)
    }
}

/// Drags the agent's horde rally point onto the last known player position.
///
/// Meant to run for the horde leader only, so the whole group advances on
/// the player together. Small moves (under one unit) are skipped.
pub struct MoveRallyPointToPlayer;

impl MoveRallyPointToPlayer {
    const MIN_SHIFT: f32 = 1.0;
}

impl Behavior<AiContext> for MoveRallyPointToPlayer {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let (agent, now) = (ctx.agent, ctx.now);
        let Some(state) = ctx.agent_state() else {
            return Status::Failure;
        };
        let (Some(horde_id), Some(target)) = (state.horde(), state.player_position) else {
            return Status::Failure;
        };

        let current = match ctx.manager().horde(horde_id) {
            Ok(horde) => horde.rally_point,
            Err(err) => {
                report(agent, &err);
                return Status::Failure;
            }
        };
        if current.distance(target) < Self::MIN_SHIFT {
            return Status::Success;
        }

        if let Err(err) = ctx.manager_mut().set_rally_point(horde_id, target) {
            report(agent, &err);
            return Status::Failure;
        }
        tracing::debug!(%agent, horde = %horde_id, rally_point = ?target, "rally point moved");
        ctx.publish(HordeEvent::RallyPointMoved {
            horde: horde_id,
            rally_point: target,
            at: now,
        });
        ctx.set_rally_point(target);
        Status::Success
    }
}

/// Walks toward the horde's rally point.
///
/// Uses the rally point cached by [`SyncHordeState`] when present and falls
/// back to looking the horde up.
pub struct MoveToRallyPoint;

impl Behavior<AiContext> for MoveToRallyPoint {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let target = match ctx.rally_point() {
            Some(point) => point,
            None => {
                let Some(horde_id) = ctx.agent_state().and_then(|state| state.horde()) else {
                    return Status::Failure;
                };
                match ctx.manager().horde(horde_id) {
                    Ok(horde) => horde.rally_point,
                    Err(err) => {
                        report(ctx.agent, &err);
                        return Status::Failure;
                    }
                }
            }
        };
        ctx.walk_to(target)
    }
}

/// Wanders between random points around the agent.
///
/// A target is kept until it is reached, then a new one is drawn on the next
/// tick.
pub struct Roam;

impl Behavior<AiContext> for Roam {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        let Some(position) = ctx.position() else {
            return Status::Failure;
        };
        let target = match ctx.roam_target() {
            Some(target) => target,
            None => {
                let target = ctx.random_point_around(position);
                ctx.set_roam_target(target);
                target
            }
        };

        let status = ctx.walk_to(target);
        if status.is_success() {
            ctx.clear_roam_target();
        }
        status
    }
}

/// Stops in place. Always succeeds.
pub struct Hold;

impl Behavior<AiContext> for Hold {
    fn tick(&self, ctx: &mut AiContext) -> Status {
        ctx.stop();
        Status::Success
    }
}
