use rb_core::{ActionKind, CoreError};
use rb_parse::ParseError;

use crate::state::MachineState;

/// Result type for reconstruction.
pub type GameResult<T> = Result<T, GameError>;

/// Everything that aborts the reconstruction of a game.
///
/// None of these are recoverable: the game's remaining events are not
/// processed once one is raised.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A narration sentence did not fit its family's grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An event arrived in the wrong state, or named someone the tracked state disagrees with.
    #[error("{action} in state {state}: {detail}")]
    StateViolation {
        /// Machine state when the event arrived.
        state: MachineState,
        /// The event's action.
        action: ActionKind,
        /// What did not match.
        detail: String,
    },

    /// The reconstructed snapshot disagrees with the observed one.
    #[error("play {play}: reconstructed snapshot differs in {}", .fields.join(", "))]
    Consistency {
        /// Play index of the event.
        play: i64,
        /// Differing field names.
        fields: Vec<String>,
    },

    /// A roster lookup failed.
    #[error(transparent)]
    Roster(#[from] CoreError),

    /// The input feed is unusable.
    #[error("unusable feed: {0}")]
    Feed(String),
}
