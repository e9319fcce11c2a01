use serde::{Deserialize, Serialize};

use crate::ids::{GameId, TeamId};
use crate::snapshot::{Side, Snapshot};

/// Static data for one side of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SideSetup {
    /// Team identifier.
    pub team: TeamId,
    /// Pre-game odds.
    pub odds: f64,
    /// Outs per half-inning.
    pub outs: i64,
    /// Balls per walk.
    pub balls: i64,
    /// Strikes per strikeout.
    pub strikes: i64,
    /// Number of bases, home included.
    pub bases: i64,
    /// Full team name ("Unlimited Tacos").
    pub team_name: String,
    /// Team nickname ("Tacos").
    pub team_nickname: String,
    /// Primary color.
    pub team_color: String,
    /// Emoji.
    pub team_emoji: String,
    /// Secondary color.
    pub team_secondary_color: String,
}

impl SideSetup {
    /// A side with standard rules: 3 outs, 4 balls, 3 strikes, 4 bases.
    pub fn standard(team: TeamId, name: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            team,
            odds: 0.5,
            outs: 3,
            balls: 4,
            strikes: 3,
            bases: 4,
            team_name: name.into(),
            team_nickname: nickname.into(),
            ..Self::default()
        }
    }
}

/// Fields of a game that never change while it is played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSetup {
    /// Game identifier.
    pub id: GameId,
    /// Day of the season.
    pub day: i64,
    /// Season number.
    pub season: i64,
    /// Weather code.
    pub weather: i64,
    /// Rules reference.
    pub rules: String,
    /// Statsheet reference.
    pub statsheet: String,
    /// Terminology reference.
    pub terminology: String,
    /// Stadium, if the game has one.
    pub stadium_id: Option<String>,
    /// Tournament code (-1 outside tournaments).
    pub tournament: i64,
    /// Position in the series.
    pub series_index: i64,
    /// Games in the series.
    pub series_length: i64,
    /// Whether this is a postseason game.
    pub is_postseason: bool,
    /// Whether this is a title match.
    pub is_title_match: bool,
    /// Away side.
    pub away: SideSetup,
    /// Home side.
    pub home: SideSetup,
}

impl GameSetup {
    /// Recover the setup from observed snapshots.
    ///
    /// Game-wide fields come from the first snapshot; per-side fields take the
    /// first non-empty value across all of them, since early snapshots often
    /// leave them blank.
    pub fn from_snapshots(snapshots: &[Snapshot]) -> Option<Self> {
        let first = snapshots.first()?;
        Some(Self {
            id: first.id,
            day: first.day,
            season: first.season,
            weather: first.weather,
            rules: first.rules.clone(),
            statsheet: first.statsheet.clone(),
            terminology: first.terminology.clone(),
            stadium_id: first.stadium_id.clone(),
            tournament: first.tournament,
            series_index: first.series_index,
            series_length: first.series_length,
            is_postseason: first.is_postseason,
            is_title_match: first.is_title_match,
            away: side_from_snapshots(snapshots, Side::Away),
            home: side_from_snapshots(snapshots, Side::Home),
        })
    }

    /// Setup for one side.
    pub fn side(&self, side: Side) -> &SideSetup {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }
}

fn first_truthy<T: Clone + PartialEq + Default>(
    snapshots: &[Snapshot],
    field: impl Fn(&Snapshot) -> &T,
) -> T {
    let empty = T::default();
    snapshots
        .iter()
        .map(field)
        .find(|v| **v != empty)
        .cloned()
        .unwrap_or_default()
}

fn side_from_snapshots(snapshots: &[Snapshot], side: Side) -> SideSetup {
    match side {
        Side::Away => SideSetup {
            team: first_truthy(snapshots, |s| &s.away_team),
            odds: first_truthy(snapshots, |s| &s.away_odds),
            outs: first_truthy(snapshots, |s| &s.away_outs),
            balls: first_truthy(snapshots, |s| &s.away_balls),
            strikes: first_truthy(snapshots, |s| &s.away_strikes),
            bases: first_truthy(snapshots, |s| &s.away_bases),
            team_name: first_truthy(snapshots, |s| &s.away_team_name),
            team_nickname: first_truthy(snapshots, |s| &s.away_team_nickname),
            team_color: first_truthy(snapshots, |s| &s.away_team_color),
            team_emoji: first_truthy(snapshots, |s| &s.away_team_emoji),
            team_secondary_color: first_truthy(snapshots, |s| &s.away_team_secondary_color),
        },
        Side::Home => SideSetup {
            team: first_truthy(snapshots, |s| &s.home_team),
            odds: first_truthy(snapshots, |s| &s.home_odds),
            outs: first_truthy(snapshots, |s| &s.home_outs),
            balls: first_truthy(snapshots, |s| &s.home_balls),
            strikes: first_truthy(snapshots, |s| &s.home_strikes),
            bases: first_truthy(snapshots, |s| &s.home_bases),
            team_name: first_truthy(snapshots, |s| &s.home_team_name),
            team_nickname: first_truthy(snapshots, |s| &s.home_team_nickname),
            team_color: first_truthy(snapshots, |s| &s.home_team_color),
            team_emoji: first_truthy(snapshots, |s| &s.home_team_emoji),
            team_secondary_color: first_truthy(snapshots, |s| &s.home_team_secondary_color),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_truthy_skips_blank_early_snapshots() {
        let early = Snapshot {
            day: 12,
            ..Snapshot::default()
        };
        let later = Snapshot {
            away_team_name: "Unlimited Tacos".into(),
            away_outs: 3,
            day: 99,
            ..Snapshot::default()
        };

        let setup = GameSetup::from_snapshots(&[early, later]).unwrap();
        assert_eq!(setup.away.team_name, "Unlimited Tacos");
        assert_eq!(setup.away.outs, 3);
        // Game-wide fields come from the first snapshot only.
        assert_eq!(setup.day, 12);
    }

    #[test]
    fn no_snapshots_no_setup() {
        assert!(GameSetup::from_snapshots(&[]).is_none());
    }
}
