/// Configuration for a reconstruction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructConfig {
    /// Innings in a regulation game; the game may end after any half-inning
    /// from this inning on when the batting side trails.
    pub regulation_innings: i64,
    /// Whether `step` diffs each snapshot against the observed one.
    pub verify: bool,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            regulation_innings: 9,
            verify: true,
        }
    }
}

impl ReconstructConfig {
    /// Set the regulation inning count.
    pub fn with_regulation_innings(mut self, innings: i64) -> Self {
        self.regulation_innings = innings;
        self
    }

    /// Enable or disable verification against observed snapshots.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = ReconstructConfig::default();
        assert_eq!(config.regulation_innings, 9);
        assert!(config.verify);
    }

    #[test]
    fn config_builder_chain() {
        let config = ReconstructConfig::default()
            .with_regulation_innings(3)
            .with_verify(false);
        assert_eq!(config.regulation_innings, 3);
        assert!(!config.verify);
    }
}
