//! Play recording and seeded replay.
//!
//! A [`Recorder`] watches one side of a reconstructed game and keeps what the
//! batters did at the plate, how far runners went beyond what each play
//! forced, and when runners tried to steal. A [`ReplayGenerator`] drives a
//! fresh reconstruction from those records, producing a synthetic game that
//! obeys the same rules.

pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod pitch;
pub mod recorder;
pub mod replay;

#[cfg(test)]
mod testing;

pub use cache::{CacheConfig, GameCache};
pub use config::ModelConfig;
pub use error::{ModelError, ModelResult};
pub use loader::{RecordedGame, record_game};
pub use pitch::{Pitch, PitchOutcome, StealDecision};
pub use recorder::Recorder;
pub use replay::ReplayGenerator;
