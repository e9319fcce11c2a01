//! Command-line frontend for rebuild: reconstruct game feeds, replay them,
//! and check narration sentences against their grammars.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rb",
    about = "rebuild: game snapshots from narration feeds",
    version,
    propagate_version = true
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild every snapshot of a game from its feed
    Reconstruct {
        /// Game feed (JSON)
        feed: PathBuf,

        /// Roster file (JSON)
        #[arg(short, long)]
        roster: PathBuf,

        /// Print the snapshots as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Skip checking against observed snapshots
        #[arg(long)]
        no_verify: bool,

        /// Regulation innings
        #[arg(long, default_value = "9")]
        innings: i64,
    },

    /// Record a game, then play a synthetic one from the records
    Replay {
        /// Game feed (JSON)
        feed: PathBuf,

        /// Roster file (JSON)
        #[arg(short, long)]
        roster: PathBuf,

        /// RNG seed for a reproducible replay
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Stop after this many plays
        #[arg(long, default_value = "1000")]
        max_plays: i64,

        /// Print the snapshots as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Regulation innings
        #[arg(long, default_value = "9")]
        innings: i64,
    },

    /// Parse one narration sentence and print its tree
    Parse {
        /// Sentence family (e.g. hit, steal, fielding-out)
        family: String,

        /// The sentence; use \n between clauses
        sentence: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Reconstruct {
            feed,
            roster,
            json,
            no_verify,
            innings,
        } => commands::reconstruct::run(&feed, &roster, json, !no_verify, innings),
        Commands::Replay {
            feed,
            roster,
            seed,
            max_plays,
            json,
            innings,
        } => commands::replay::run(&feed, &roster, seed, max_plays, json, innings),
        Commands::Parse { family, sentence } => commands::parse::run(&family, &sentence),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
