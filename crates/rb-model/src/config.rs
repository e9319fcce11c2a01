//! Configuration for recording and replay.

use rb_engine::ReconstructConfig;

/// Configuration for a replay run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// RNG seed for reproducible replays.
    pub seed: u64,
    /// Plays after which a replay stops even if the game has not ended.
    pub max_plays: i64,
    /// Settings for the reconstructor the replay drives.
    pub engine: ReconstructConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_plays: 1000,
            engine: ReconstructConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the play ceiling (at least 1).
    pub fn with_max_plays(mut self, max_plays: i64) -> Self {
        self.max_plays = max_plays.max(1);
        self
    }

    /// Set the reconstructor configuration.
    pub fn with_engine(mut self, engine: ReconstructConfig) -> Self {
        self.engine = engine;
        self
    }
}
