//! Error types for the core crate.

use thiserror::Error;

use crate::ids::{PlayerId, TeamId};

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by roster lookups and snapshot invariant checks.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The roster has no record of this team at the requested time.
    #[error("team not found in roster: {0}")]
    TeamNotFound(TeamId),

    /// The roster has no record of this player at the requested time.
    #[error("player not found in roster: {0}")]
    PlayerNotFound(PlayerId),

    /// A team was constructed without any batters.
    #[error("team {0} has an empty lineup")]
    EmptyLineup(TeamId),

    /// A snapshot violated one of its structural invariants.
    #[error("broken snapshot invariant: {0}")]
    BrokenInvariant(String),

    /// Roster data could not be decoded.
    #[error("invalid roster data: {0}")]
    Json(#[from] serde_json::Error),
}
