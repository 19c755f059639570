//! Condition and action nodes over [`AiContext`](super::AiContext).
//!
//! Conditions answer a question about the focused agent; actions change
//! coordination state or issue requests to the host. Errors from the
//! coordination service never escape a node: they are logged and turned into
//! `Status::Failure` so the caller falls through to its next option.

mod actions;
mod conditions;

pub use actions::{
    FoundHorde, Hold, JoinNearestHorde, MarkAlone, MoveRallyPointToPlayer, MoveToRallyPoint,
    MoveTowardPlayer, RecordHordeCheck, Roam, SyncHordeState,
};
pub use conditions::{CanSeePlayer, HasHorde, IsHordeCheckDue, IsHordeLeader};

use horde_core::{AgentId, HordeError};

/// Logs a coordination error at a level matching its severity.
fn report(agent: AgentId, err: &HordeError) {
    if err.severity().is_recoverable() {
        tracing::debug!(%agent, code = err.error_code(), "{err}");
    } else {
        tracing::warn!(%agent, code = err.error_code(), severity = %err.severity(), "{err}");
    }
}
