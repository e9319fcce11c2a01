//! Error types for recording and replay.

use rb_core::{CoreError, PlayerId};
use rb_engine::GameError;
use rb_parse::ParseError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while recording a game or replaying one.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Nothing was recorded to sample a decision from.
    #[error("no recorded {decision} history for player {player}")]
    ExhaustedModel {
        /// The player the decision was needed for.
        player: PlayerId,
        /// What kind of decision it was.
        decision: &'static str,
    },

    /// An action code in neither the recorded nor the ignored tables.
    #[error("unknown action code {0}")]
    UnknownAction(i64),

    /// A batter-up event named someone the recorder does not expect.
    #[error("cannot tell who is batting: {0}")]
    UnknownBatter(String),

    /// A narration sentence did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reconstruction failed.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Roster lookup failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
