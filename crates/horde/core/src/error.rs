//! Error infrastructure for horde coordination.
//!
//! Every fallible operation in this crate returns [`HordeError`]. None of the
//! variants is fatal: the behavior adapter turns all of them into a failed
//! tick and the agent retries after its next check interval.

use crate::types::{AgentId, HordeId};

pub type Result<T> = std::result::Result<T, HordeError>;

/// Severity level of an error, used to pick a log level and recovery strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorSeverity {
    /// Expected during normal play; retrying later may succeed.
    ///
    /// Examples: horde is full, nobody nearby to group with
    Recoverable,

    /// Invalid input such as a stale id held by the caller.
    Validation,

    /// Coordination state disagrees with itself. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HordeError {
    #[error("{0} does not exist")]
    HordeNotFound(HordeId),

    #[error("{0} is not registered")]
    AgentNotFound(AgentId),

    #[error("cannot create a horde with zero capacity")]
    ZeroCapacity,

    #[error("{horde} is full ({capacity} members)")]
    Full { horde: HordeId, capacity: usize },

    #[error("no joinable horde and not enough unassigned agents near {agent}")]
    NoCandidate { agent: AgentId },

    #[error("membership inconsistency: {reason} ({agent}, {horde})")]
    Inconsistent {
        reason: &'static str,
        agent: AgentId,
        horde: HordeId,
    },
}

impl HordeError {
    pub const fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Full { .. } | Self::NoCandidate { .. } => ErrorSeverity::Recoverable,
            Self::HordeNotFound(_) | Self::AgentNotFound(_) | Self::ZeroCapacity => {
                ErrorSeverity::Validation
            }
            Self::Inconsistent { .. } => ErrorSeverity::Internal,
        }
    }

    /// Stable identifier for logs and assertions.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::HordeNotFound(_) => "HORDE_NOT_FOUND",
            Self::AgentNotFound(_) => "AGENT_NOT_FOUND",
            Self::ZeroCapacity => "ZERO_CAPACITY",
            Self::Full { .. } => "HORDE_FULL",
            Self::NoCandidate { .. } => "NO_CANDIDATE",
            Self::Inconsistent { .. } => "INCONSISTENT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        let full = HordeError::Full {
            horde: HordeId(1),
            capacity: 3,
        };
        assert!(full.severity().is_recoverable());
        assert_eq!(full.error_code(), "HORDE_FULL");

        let missing = HordeError::AgentNotFound(AgentId(9));
        assert_eq!(missing.severity(), ErrorSeverity::Validation);
        assert_eq!(missing.to_string(), "agent#9 is not registered");

        let broken = HordeError::Inconsistent {
            reason: "member without back-reference",
            agent: AgentId(1),
            horde: HordeId(2),
        };
        assert!(broken.severity().is_internal());
        assert_eq!(broken.severity().to_string(), "internal");
    }
}
