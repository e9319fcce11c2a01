use std::path::Path;

use colored::Colorize;
use rb_engine::ReconstructConfig;
use rb_model::{ModelConfig, record_game};

pub fn run(feed: &Path, roster: &Path, seed: u64, max_plays: i64, json: bool, innings: i64) -> Result<(), String> {
    let game = super::load_feed(feed)?;
    let roster = super::load_roster(roster)?;
    let engine = ReconstructConfig::default().with_regulation_innings(innings);

    let recorded = record_game(&game, &roster, &engine).map_err(|e| format!("recording failed: {e}"))?;
    if !json {
        println!(
            "  {} {} {}",
            "Replay".bold(),
            format!("(seed={seed})").dimmed(),
            format!(
                "from {} recorded pitches",
                recorded.away.pitches().len() + recorded.home.pitches().len()
            )
            .dimmed()
        );
        println!();
    }

    let config = ModelConfig::default()
        .with_seed(seed)
        .with_max_plays(max_plays)
        .with_engine(engine);
    let snapshots = recorded
        .into_replay(&roster, config)
        .map_err(|e| format!("replay setup failed: {e}"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("replay failed: {e}"))?;
    super::print_snapshots(&snapshots, json)
}
