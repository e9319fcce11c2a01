pub mod parse;
pub mod reconstruct;
pub mod replay;

use std::fs;
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rb_core::{Snapshot, StaticRoster};
use rb_engine::{GameFeed, format_runs};

/// Read and parse a game feed.
fn load_feed(path: &Path) -> Result<GameFeed, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    GameFeed::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Read and parse a roster file.
fn load_roster(path: &Path) -> Result<StaticRoster, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    StaticRoster::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

/// Print snapshots as a JSON array or a play-by-play table.
fn print_snapshots(snapshots: &[Snapshot], json: bool) -> Result<(), String> {
    if json {
        let out = serde_json::to_string_pretty(snapshots).map_err(|e| format!("cannot serialize snapshots: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Play", "Inning", "Half", "Outs", "Count", "Score", "Narration"]);

    for s in snapshots {
        let inning = if s.inning < 0 { "-".to_string() } else { (s.inning + 1).to_string() };
        let half = if s.inning < 0 {
            "-"
        } else if s.top_of_inning {
            "top"
        } else {
            "bottom"
        };
        let score = format!("{}-{}", format_runs(s.away_score), format_runs(s.home_score));
        table.add_row(vec![
            s.play_count.to_string(),
            inning,
            half.to_string(),
            s.half_inning_outs.to_string(),
            format!("{}-{}", s.at_bat_balls, s.at_bat_strikes),
            score,
            s.last_update.replace('\n', " / "),
        ]);
    }

    println!("{table}");
    println!();
    if let Some(last) = snapshots.last() {
        let status = if last.finalized {
            "final".green().bold()
        } else {
            "in progress".yellow().bold()
        };
        println!(
            "  {} {}, {} {}  ({status}, {} snapshots)",
            last.away_team_nickname,
            format_runs(last.away_score),
            last.home_team_nickname,
            format_runs(last.home_score),
            snapshots.len()
        );
    } else {
        println!("  {}", "(no snapshots)".dimmed());
    }
    Ok(())
}
