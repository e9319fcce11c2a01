use rayon::prelude::*;
use rb_core::{GameSetup, NarrationEvent, Roster, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ReconstructConfig;
use crate::error::{GameError, GameResult};
use crate::reconstructor::Reconstructor;

/// Everything recorded about one game: narration plus whatever snapshots
/// were observed alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameFeed {
    /// Explicit setup; recovered from `snapshots` when absent.
    pub setup: Option<GameSetup>,
    /// Narration events, in any order.
    pub events: Vec<NarrationEvent>,
    /// Observed snapshots, in any order.
    pub snapshots: Vec<Snapshot>,
}

impl GameFeed {
    /// Parse a feed from JSON.
    pub fn from_json(json: &str) -> GameResult<Self> {
        serde_json::from_str(json).map_err(|e| GameError::Feed(e.to_string()))
    }

    /// The game's setup.
    pub fn setup(&self) -> GameResult<GameSetup> {
        if let Some(setup) = &self.setup {
            return Ok(setup.clone());
        }
        GameSetup::from_snapshots(&self.snapshots)
            .ok_or_else(|| GameError::Feed("feed has neither a setup nor snapshots".into()))
    }

    /// When the game started: the earliest event's timestamp.
    pub fn start_time(&self) -> GameResult<chrono::DateTime<chrono::Utc>> {
        self.events
            .iter()
            .map(|e| e.created)
            .min()
            .ok_or_else(|| GameError::Feed("feed has no events".into()))
    }

    /// Events sorted by play, then sub-play.
    pub fn ordered_events(&self) -> Vec<&NarrationEvent> {
        let mut events: Vec<_> = self.events.iter().collect();
        events.sort_by_key(|e| e.metadata);
        events
    }

    /// The observed snapshot following `play`, if one was recorded.
    ///
    /// The feed sometimes holds several snapshots for one play count. The one
    /// with narration wins; failing that, the finalized one.
    pub fn observed_for(&self, play: i64) -> GameResult<Option<&Snapshot>> {
        let candidates: Vec<&Snapshot> = self.snapshots.iter().filter(|s| s.play_count == play + 1).collect();
        if candidates.len() <= 1 {
            return Ok(candidates.first().copied());
        }
        let narrated: Vec<&Snapshot> = candidates.iter().copied().filter(|s| !s.last_update.is_empty()).collect();
        if let [only] = narrated.as_slice() {
            return Ok(Some(*only));
        }
        let finalized: Vec<&Snapshot> = candidates.iter().copied().filter(|s| s.finalized).collect();
        if let [only] = finalized.as_slice() {
            return Ok(Some(*only));
        }
        Err(GameError::Feed(format!(
            "{} snapshots follow play {play} and none stands out",
            candidates.len()
        )))
    }

    /// Events in order, each paired with the observed snapshot that follows it.
    ///
    /// Observed snapshots are attached to the last event of their play only;
    /// earlier sub-plays have nothing to be checked against.
    pub fn paired_events(&self) -> GameResult<Vec<(&NarrationEvent, Option<&Snapshot>)>> {
        let events = self.ordered_events();
        let mut paired = Vec::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            let last_of_play = events
                .get(i + 1)
                .is_none_or(|next| next.metadata.play != event.metadata.play);
            let observed = if last_of_play {
                self.observed_for(event.metadata.play)?
            } else {
                None
            };
            paired.push((*event, observed));
        }
        Ok(paired)
    }
}

/// Reconstruct every snapshot of one game.
pub fn reconstruct_game<R: Roster>(feed: &GameFeed, roster: R, config: &ReconstructConfig) -> GameResult<Vec<Snapshot>> {
    let setup = feed.setup()?;
    let mut machine = Reconstructor::new(&setup, roster, feed.start_time()?, config.clone())?;

    let paired = feed.paired_events()?;
    let mut produced = Vec::with_capacity(paired.len());
    for (event, observed) in paired {
        produced.push(machine.step(event, observed)?);
    }

    info!(game = %setup.id, snapshots = produced.len(), state = %machine.state(), "reconstructed game");
    Ok(produced)
}

/// Reconstruct many games in parallel. Each game succeeds or fails on its own.
pub fn reconstruct_batch<R: Roster + Sync>(
    feeds: &[GameFeed],
    roster: &R,
    config: &ReconstructConfig,
) -> Vec<GameResult<Vec<Snapshot>>> {
    feeds
        .par_iter()
        .map(|feed| {
            let result = reconstruct_game(feed, roster, config);
            if let Err(e) = &result {
                warn!(error = %e, "game reconstruction failed");
            }
            result
        })
        .collect()
}
