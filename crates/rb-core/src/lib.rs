//! Core types for rebuild.
//!
//! Everything the reconstructor, recorder, and replay generator share lives
//! here: identifiers, the per-side roster view ([`TeamState`]), the fully typed
//! [`Snapshot`] record, narration events with their decoded [`ActionKind`],
//! and the [`Roster`] trait through which roster-at-time data is supplied.

/// Base advancement: resolving where runners end up after a play.
pub mod bases;
/// Error types for the core crate.
pub mod error;
/// Typed identifiers for games, teams, and players.
pub mod ids;
/// Narration events and the action kinds they decode into.
pub mod narration;
/// Point-in-time player state and modifier display rules.
pub mod player;
/// Roster-at-time lookups and a static, file-backed roster.
pub mod roster;
/// Static per-game data used to seed the first snapshot.
pub mod setup;
/// The snapshot record evolved by the reconstructor.
pub mod snapshot;
/// Per-side roster view: pitcher, lineup, batter index.
pub mod team;

/// Re-exports of [`error::CoreError`] and [`error::CoreResult`].
pub use error::{CoreError, CoreResult};
/// Re-exports of the identifier newtypes.
pub use ids::{GameId, PlayerId, TeamId};
/// Re-exports of [`narration::ActionKind`], [`narration::EventMetadata`], and [`narration::NarrationEvent`].
pub use narration::{ActionKind, EventMetadata, NarrationEvent};
/// Re-exports of [`player::ModSlot`] and [`player::PlayerState`].
pub use player::{ModSlot, PlayerState};
/// Re-exports of [`roster::Roster`], [`roster::StaticRoster`], and [`roster::TeamRecord`].
pub use roster::{Roster, StaticRoster, TeamRecord};
/// Re-exports of [`setup::GameSetup`] and [`setup::SideSetup`].
pub use setup::{GameSetup, SideSetup};
/// Re-exports of [`snapshot::Side`] and [`snapshot::Snapshot`].
pub use snapshot::{Side, Snapshot};
/// Re-export of [`team::TeamState`].
pub use team::TeamState;
