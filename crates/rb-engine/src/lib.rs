//! Snapshot reconstruction for rebuild.
//!
//! A [`Reconstructor`] consumes narration events one at a time and rebuilds
//! the full [`rb_core::Snapshot`] after each, optionally checking it against
//! an observed snapshot. [`feed`] wraps that into whole-game and batch runs.

/// Configuration types for reconstruction runs.
pub mod config;
/// Error types for the engine crate.
pub mod error;
/// Game feeds, observed-snapshot selection, and batch reconstruction.
pub mod feed;
/// Per-action handlers for the pitch state.
mod plays;
/// Scoring, outs, placement, and refill policies shared by the handlers.
mod policy;
/// The reconstruction state machine.
pub mod reconstructor;
/// Machine states.
pub mod state;

#[cfg(test)]
mod testing;

/// Re-export of [`config::ReconstructConfig`].
pub use config::ReconstructConfig;
/// Re-exports of [`error::GameError`] and [`error::GameResult`].
pub use error::{GameError, GameResult};
/// Re-exports of [`feed::GameFeed`], [`feed::reconstruct_game`], and [`feed::reconstruct_batch`].
pub use feed::{GameFeed, reconstruct_batch, reconstruct_game};
/// Re-exports of [`reconstructor::Reconstructor`] and [`reconstructor::RunnerTruth`].
pub use reconstructor::{Reconstructor, RunnerTruth};
/// Re-export of [`state::MachineState`].
pub use state::MachineState;
/// Re-export of [`policy::format_runs`].
pub use policy::format_runs;
