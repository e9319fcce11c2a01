use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ids::{GameId, PlayerId, TeamId};
use crate::player::{ModSlot, PlayerState};
use crate::setup::GameSetup;

/// One side of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Visiting team, bats in the top half.
    Away,
    /// Home team, bats in the bottom half.
    Home,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Away => Side::Home,
            Side::Home => Side::Away,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Away => write!(f, "away"),
            Side::Home => write!(f, "home"),
        }
    }
}

/// The complete state record of a game after one play.
///
/// Field names serialize exactly as the snapshot feed names them, so a
/// reconstructed snapshot can be diffed against an observed one field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(missing_docs)]
pub struct Snapshot {
    pub id: GameId,
    pub day: i64,
    pub phase: i64,
    pub rules: String,
    pub shame: bool,
    pub inning: i64,
    pub season: i64,
    pub weather: i64,
    pub away_odds: f64,
    pub away_outs: i64,
    pub away_team: TeamId,
    pub home_odds: f64,
    pub home_outs: i64,
    pub home_team: TeamId,
    pub outcomes: Vec<String>,
    pub away_balls: i64,
    pub away_bases: i64,
    pub away_score: f64,
    pub finalized: bool,
    pub game_start: bool,
    pub home_balls: i64,
    pub home_bases: i64,
    pub home_score: f64,
    pub play_count: i64,
    pub stadium_id: Option<String>,
    pub statsheet: String,
    pub at_bat_balls: i64,
    pub away_batter: Option<PlayerId>,
    pub home_batter: Option<PlayerId>,
    pub last_update: String,
    pub tournament: i64,
    pub away_pitcher: Option<PlayerId>,
    pub away_strikes: i64,
    pub base_runners: Vec<PlayerId>,
    pub home_pitcher: Option<PlayerId>,
    pub home_strikes: i64,
    pub repeat_count: i64,
    pub score_ledger: String,
    pub score_update: String,
    pub series_index: i64,
    pub terminology: String,
    pub top_of_inning: bool,
    pub at_bat_strikes: i64,
    pub away_team_name: String,
    pub game_complete: bool,
    pub home_team_name: String,
    pub is_postseason: bool,
    pub is_title_match: bool,
    pub series_length: i64,
    pub away_batter_mod: String,
    pub away_team_color: String,
    pub away_team_emoji: String,
    pub bases_occupied: Vec<i64>,
    pub home_batter_mod: String,
    pub home_team_color: String,
    pub home_team_emoji: String,
    pub away_batter_name: String,
    pub away_pitcher_mod: String,
    pub base_runner_mods: Vec<String>,
    pub game_start_phase: i64,
    pub half_inning_outs: i64,
    pub home_batter_name: String,
    pub home_pitcher_mod: String,
    pub new_inning_phase: i64,
    pub top_inning_score: f64,
    pub away_pitcher_name: String,
    pub base_runner_names: Vec<String>,
    pub baserunner_count: i64,
    pub half_inning_score: f64,
    pub home_pitcher_name: String,
    pub away_team_nickname: String,
    pub home_team_nickname: String,
    pub secret_baserunner: Option<PlayerId>,
    pub bottom_inning_score: f64,
    pub away_team_batter_count: i64,
    pub home_team_batter_count: i64,
    pub away_team_secondary_color: String,
    pub home_team_secondary_color: String,
}

impl Snapshot {
    /// The snapshot before any narration has been applied.
    pub fn new(setup: &GameSetup) -> Self {
        let away = &setup.away;
        let home = &setup.home;
        Self {
            id: setup.id,
            day: setup.day,
            phase: 2,
            rules: setup.rules.clone(),
            season: setup.season,
            weather: setup.weather,
            away_odds: away.odds,
            away_outs: away.outs,
            away_team: away.team,
            home_odds: home.odds,
            home_outs: home.outs,
            home_team: home.team,
            away_balls: away.balls,
            away_bases: away.bases,
            home_balls: home.balls,
            home_bases: home.bases,
            stadium_id: setup.stadium_id.clone(),
            statsheet: setup.statsheet.clone(),
            tournament: setup.tournament,
            away_strikes: away.strikes,
            home_strikes: home.strikes,
            series_index: setup.series_index,
            terminology: setup.terminology.clone(),
            top_of_inning: true,
            away_team_name: away.team_name.clone(),
            home_team_name: home.team_name.clone(),
            is_postseason: setup.is_postseason,
            is_title_match: setup.is_title_match,
            series_length: setup.series_length,
            away_team_color: away.team_color.clone(),
            away_team_emoji: away.team_emoji.clone(),
            home_team_color: home.team_color.clone(),
            home_team_emoji: home.team_emoji.clone(),
            game_start_phase: -1,
            new_inning_phase: -1,
            away_team_nickname: away.team_nickname.clone(),
            home_team_nickname: home.team_nickname.clone(),
            away_team_secondary_color: away.team_secondary_color.clone(),
            home_team_secondary_color: home.team_secondary_color.clone(),
            ..Self::default()
        }
    }

    /// The side currently at bat.
    pub fn batting_side(&self) -> Side {
        if self.top_of_inning { Side::Away } else { Side::Home }
    }

    /// The side currently in the field.
    pub fn fielding_side(&self) -> Side {
        self.batting_side().opponent()
    }

    /// Outs that end a half-inning for this side.
    pub fn outs_per_inning(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away_outs,
            Side::Home => self.home_outs,
        }
    }

    /// Balls that make a walk for this side.
    pub fn balls_per_walk(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away_balls,
            Side::Home => self.home_balls,
        }
    }

    /// Strikes that make a strikeout for this side.
    pub fn strikes_per_out(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away_strikes,
            Side::Home => self.home_strikes,
        }
    }

    /// Number of bases for this side, home included.
    pub fn base_count(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away_bases,
            Side::Home => self.home_bases,
        }
    }

    /// Full team name.
    pub fn team_name(&self, side: Side) -> &str {
        match side {
            Side::Away => &self.away_team_name,
            Side::Home => &self.home_team_name,
        }
    }

    /// Team nickname.
    pub fn team_nickname(&self, side: Side) -> &str {
        match side {
            Side::Away => &self.away_team_nickname,
            Side::Home => &self.home_team_nickname,
        }
    }

    /// Current score.
    pub fn score(&self, side: Side) -> f64 {
        match side {
            Side::Away => self.away_score,
            Side::Home => self.home_score,
        }
    }

    /// Mutable score.
    pub fn score_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::Away => &mut self.away_score,
            Side::Home => &mut self.home_score,
        }
    }

    /// The top- or bottom-of-inning accumulator for the half being played.
    pub fn inning_score_mut(&mut self) -> &mut f64 {
        if self.top_of_inning {
            &mut self.top_inning_score
        } else {
            &mut self.bottom_inning_score
        }
    }

    /// Batters sent to the plate so far.
    pub fn team_batter_count(&self, side: Side) -> i64 {
        match side {
            Side::Away => self.away_team_batter_count,
            Side::Home => self.home_team_batter_count,
        }
    }

    /// Mutable batter count.
    pub fn team_batter_count_mut(&mut self, side: Side) -> &mut i64 {
        match side {
            Side::Away => &mut self.away_team_batter_count,
            Side::Home => &mut self.home_team_batter_count,
        }
    }

    /// Current batter id.
    pub fn batter(&self, side: Side) -> Option<PlayerId> {
        match side {
            Side::Away => self.away_batter,
            Side::Home => self.home_batter,
        }
    }

    /// Current batter display name.
    pub fn batter_name(&self, side: Side) -> &str {
        match side {
            Side::Away => &self.away_batter_name,
            Side::Home => &self.home_batter_name,
        }
    }

    /// Set or clear the batter id, name, and mod fields.
    pub fn set_batter(&mut self, side: Side, batter: Option<&PlayerState>) {
        let (id, name, modifier) = display_fields(batter, ModSlot::Batter);
        match side {
            Side::Away => {
                self.away_batter = id;
                self.away_batter_name = name;
                self.away_batter_mod = modifier;
            }
            Side::Home => {
                self.home_batter = id;
                self.home_batter_name = name;
                self.home_batter_mod = modifier;
            }
        }
    }

    /// Mutable batter mod summary.
    pub fn batter_mod_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Away => &mut self.away_batter_mod,
            Side::Home => &mut self.home_batter_mod,
        }
    }

    /// Current pitcher id.
    pub fn pitcher(&self, side: Side) -> Option<PlayerId> {
        match side {
            Side::Away => self.away_pitcher,
            Side::Home => self.home_pitcher,
        }
    }

    /// Set or clear the pitcher id, name, and mod fields.
    pub fn set_pitcher(&mut self, side: Side, pitcher: Option<&PlayerState>) {
        let (id, name, modifier) = display_fields(pitcher, ModSlot::Pitcher);
        match side {
            Side::Away => {
                self.away_pitcher = id;
                self.away_pitcher_name = name;
                self.away_pitcher_mod = modifier;
            }
            Side::Home => {
                self.home_pitcher = id;
                self.home_pitcher_name = name;
                self.home_pitcher_mod = modifier;
            }
        }
    }

    /// Mutable pitcher mod summary.
    pub fn pitcher_mod_mut(&mut self, side: Side) -> &mut String {
        match side {
            Side::Away => &mut self.away_pitcher_mod,
            Side::Home => &mut self.home_pitcher_mod,
        }
    }

    /// Number of runners on base.
    pub fn runner_count(&self) -> usize {
        self.base_runners.len()
    }

    /// Append a runner at the tail of the runner lists.
    pub fn push_runner(&mut self, runner: &PlayerState, base: i64) {
        self.base_runners.push(runner.id);
        self.base_runner_names.push(runner.name.clone());
        self.base_runner_mods.push(runner.mod_summary(ModSlot::Runner));
        self.bases_occupied.push(base);
        self.baserunner_count += 1;
    }

    /// Remove the runner at a list index, returning their id.
    pub fn remove_runner(&mut self, index: usize) -> Option<PlayerId> {
        if index >= self.base_runners.len() {
            return None;
        }
        self.base_runner_names.remove(index);
        self.base_runner_mods.remove(index);
        self.bases_occupied.remove(index);
        self.baserunner_count -= 1;
        Some(self.base_runners.remove(index))
    }

    /// Take everyone off base.
    pub fn clear_runners(&mut self) {
        self.base_runners.clear();
        self.base_runner_names.clear();
        self.base_runner_mods.clear();
        self.bases_occupied.clear();
        self.baserunner_count = 0;
    }

    /// List index of the runner standing on a base.
    pub fn runner_on_base(&self, base: i64) -> Option<usize> {
        self.bases_occupied.iter().position(|b| *b == base)
    }

    /// Verify the baserunner invariant and that no out count went negative.
    ///
    /// The runner id, name, mod, and base lists are index-aligned, the count
    /// matches them, and bases strictly decrease from head to tail.
    pub fn check_invariants(&self) -> CoreResult<()> {
        let n = self.base_runners.len();
        if self.base_runner_names.len() != n
            || self.base_runner_mods.len() != n
            || self.bases_occupied.len() != n
        {
            return Err(CoreError::BrokenInvariant(format!(
                "runner lists out of step: {} ids, {} names, {} mods, {} bases",
                n,
                self.base_runner_names.len(),
                self.base_runner_mods.len(),
                self.bases_occupied.len()
            )));
        }
        if self.baserunner_count != n as i64 {
            return Err(CoreError::BrokenInvariant(format!(
                "baserunnerCount is {} with {n} runners on base",
                self.baserunner_count
            )));
        }
        if let Some(pair) = self.bases_occupied.windows(2).find(|w| w[0] <= w[1]) {
            return Err(CoreError::BrokenInvariant(format!(
                "bases out of order: {:?} (runner on {} ahead of runner on {})",
                self.bases_occupied, pair[0], pair[1]
            )));
        }
        if self.half_inning_outs < 0 {
            return Err(CoreError::BrokenInvariant(format!(
                "{} outs in the half-inning",
                self.half_inning_outs
            )));
        }
        Ok(())
    }

    /// Names of every serialized field whose value differs from `other`.
    pub fn diff(&self, other: &Snapshot) -> Vec<String> {
        let (Ok(serde_json::Value::Object(ours)), Ok(serde_json::Value::Object(theirs))) =
            (serde_json::to_value(self), serde_json::to_value(other))
        else {
            return vec!["<unserializable>".into()];
        };
        ours.iter()
            .filter(|(key, value)| theirs.get(key.as_str()) != Some(value))
            .map(|(key, _)| key.clone())
            .collect()
    }
}

fn display_fields(player: Option<&PlayerState>, slot: ModSlot) -> (Option<PlayerId>, String, String) {
    match player {
        Some(p) => (Some(p.id), p.name.clone(), p.mod_summary(slot)),
        None => (None, String::new(), String::new()),
    }
}
