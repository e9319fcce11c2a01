use std::path::Path;

use rb_engine::{ReconstructConfig, reconstruct_game};

pub fn run(feed: &Path, roster: &Path, json: bool, verify: bool, innings: i64) -> Result<(), String> {
    let game = super::load_feed(feed)?;
    let roster = super::load_roster(roster)?;
    let config = ReconstructConfig::default()
        .with_regulation_innings(innings)
        .with_verify(verify);

    let snapshots = reconstruct_game(&game, &roster, &config).map_err(|e| format!("reconstruction failed: {e}"))?;
    super::print_snapshots(&snapshots, json)
}
