//! A bounded, caller-owned cache of reconstructed games.

use std::collections::VecDeque;

use rb_core::{GameId, Snapshot};
use tracing::debug;

use crate::error::ModelResult;

/// Cache sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

impl CacheConfig {
    /// Set the capacity (at least 1).
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Games kept before the least recently used one is dropped.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Reconstructed snapshots by game, least recently used evicted first.
#[derive(Debug, Default)]
pub struct GameCache {
    config: CacheConfig,
    // Most recently used at the front.
    entries: VecDeque<(GameId, Vec<Snapshot>)>,
}

impl GameCache {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: VecDeque::new(),
        }
    }

    /// Number of cached games.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a game is cached.
    pub fn contains(&self, game: GameId) -> bool {
        self.entries.iter().any(|(id, _)| *id == game)
    }

    /// The game's snapshots, loading them with `load` on a miss.
    ///
    /// A failed load caches nothing.
    pub fn get_or_insert_with<F>(&mut self, game: GameId, load: F) -> ModelResult<&[Snapshot]>
    where
        F: FnOnce() -> ModelResult<Vec<Snapshot>>,
    {
        if let Some(position) = self.entries.iter().position(|(id, _)| *id == game) {
            if let Some(entry) = self.entries.remove(position) {
                self.entries.push_front(entry);
            }
            debug!(%game, "game cache hit");
        } else {
            let snapshots = load()?;
            debug!(%game, snapshots = snapshots.len(), "game cache miss");
            self.entries.push_front((game, snapshots));
            while self.entries.len() > self.config.capacity() {
                if let Some((evicted, _)) = self.entries.pop_back() {
                    debug!(game = %evicted, "evicted game");
                }
            }
        }
        Ok(self.entries.front().map(|(_, snapshots)| snapshots.as_slice()).unwrap_or_default())
    }

    /// The snapshot after play `index` of a cached game.
    ///
    /// An index past the end gives the last snapshot. Counts as a use.
    pub fn play(&mut self, game: GameId, index: usize) -> Option<&Snapshot> {
        let position = self.entries.iter().position(|(id, _)| *id == game)?;
        let entry = self.entries.remove(position)?;
        self.entries.push_front(entry);
        let snapshots = &self.entries.front()?.1;
        snapshots.get(index).or_else(|| snapshots.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    fn game(plays: i64) -> Vec<Snapshot> {
        (1..=plays)
            .map(|play_count| Snapshot {
                play_count,
                ..Snapshot::default()
            })
            .collect()
    }

    #[test]
    fn loads_once_then_hits() {
        let mut cache = GameCache::new(CacheConfig::default());
        let id = GameId::new();
        let mut loads = 0;
        for _ in 0..3 {
            let snapshots = cache
                .get_or_insert_with(id, || {
                    loads += 1;
                    Ok(game(3))
                })
                .unwrap();
            assert_eq!(snapshots.len(), 3);
        }
        assert_eq!(loads, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let mut cache = GameCache::new(CacheConfig::default().with_capacity(2));
        let (a, b, c) = (GameId::new(), GameId::new(), GameId::new());
        cache.get_or_insert_with(a, || Ok(game(1))).unwrap();
        cache.get_or_insert_with(b, || Ok(game(1))).unwrap();
        // Touch a so b becomes the oldest.
        cache.play(a, 0).unwrap();
        cache.get_or_insert_with(c, || Ok(game(1))).unwrap();

        assert!(cache.contains(a));
        assert!(!cache.contains(b));
        assert!(cache.contains(c));
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut cache = GameCache::new(CacheConfig::default());
        let id = GameId::new();
        let err = cache
            .get_or_insert_with(id, || Err(ModelError::UnknownAction(999)))
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownAction(999)));
        assert!(cache.is_empty());
    }

    #[test]
    fn play_index_past_the_end_gives_the_last_play() {
        let mut cache = GameCache::new(CacheConfig::default());
        let id = GameId::new();
        cache.get_or_insert_with(id, || Ok(game(4))).unwrap();
        assert_eq!(cache.play(id, 1).unwrap().play_count, 2);
        assert_eq!(cache.play(id, 40).unwrap().play_count, 4);
        assert!(cache.play(GameId::new(), 0).is_none());
    }

    #[test]
    fn capacity_is_at_least_one() {
        assert_eq!(CacheConfig::default().with_capacity(0).capacity(), 1);
    }

    #[test]
    fn smallest_cache_still_holds_the_latest_game() {
        let mut cache = GameCache::new(CacheConfig::default().with_capacity(0));
        let (a, b) = (GameId::new(), GameId::new());
        assert_eq!(cache.get_or_insert_with(a, || Ok(game(2))).unwrap().len(), 2);
        assert!(cache.contains(a));
        cache.get_or_insert_with(b, || Ok(game(1))).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(b));
        assert_eq!(cache.play(b, 0).unwrap().play_count, 1);
    }
}
