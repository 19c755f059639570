//! Unified error types surfaced by the runtime API.
//!
//! Wraps coordination failures and scenario loading problems so hosts can
//! bubble them up with consistent context.
use std::path::PathBuf;

use horde_core::{AgentId, ConfigError, HordeError};
use thiserror::Error;

use crate::providers::ai::Archetype;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Horde(#[from] HordeError),

    #[error("coordinator requires a {0} to be configured before building")]
    MissingCollaborator(&'static str),

    #[error("no behavior tree registered for archetype {0}")]
    MissingTree(Archetype),

    #[error("invalid horde configuration for {agent}")]
    InvalidConfig {
        agent: AgentId,
        #[source]
        source: ConfigError,
    },

    #[error("duplicate agent {0} in scenario")]
    DuplicateAgent(AgentId),

    #[error("failed to read scenario file {}", path.display())]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario RON")]
    ScenarioParse(#[source] ron::error::SpannedError),
}
