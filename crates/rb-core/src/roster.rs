use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::ids::{PlayerId, TeamId};
use crate::player::PlayerState;

/// A team as the roster service reports it at some moment.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    /// Team identifier.
    pub id: TeamId,
    /// Nickname.
    pub nickname: String,
    /// Starting pitcher for the game.
    pub pitcher: PlayerState,
    /// Batting order.
    pub lineup: Vec<PlayerState>,
}

/// Roster-at-time lookups.
///
/// The reconstructor treats this as a synchronous external service: teams are
/// loaded at game start, players when a substitution or haunting names them.
pub trait Roster {
    /// The team as of `at`.
    fn team_at(&self, team: TeamId, at: DateTime<Utc>) -> CoreResult<TeamRecord>;

    /// The player as of `at`.
    fn player_at(&self, player: PlayerId, at: DateTime<Utc>) -> CoreResult<PlayerState>;
}

impl<T: Roster + ?Sized> Roster for &T {
    fn team_at(&self, team: TeamId, at: DateTime<Utc>) -> CoreResult<TeamRecord> {
        (**self).team_at(team, at)
    }

    fn player_at(&self, player: PlayerId, at: DateTime<Utc>) -> CoreResult<PlayerState> {
        (**self).player_at(player, at)
    }
}

/// A team entry of a [`StaticRoster`]; players are referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    /// Team identifier.
    pub id: TeamId,
    /// Nickname.
    pub nickname: String,
    /// Pitcher id.
    pub pitcher: PlayerId,
    /// Batting order, by player id.
    pub lineup: Vec<PlayerId>,
    /// First moment this version applies; `None` means always.
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
}

/// A player entry of a [`StaticRoster`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntry {
    /// The player's state for this version.
    #[serde(flatten)]
    pub player: PlayerState,
    /// First moment this version applies; `None` means always.
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
}

/// An in-memory roster holding time-versioned team and player records.
///
/// A lookup picks the latest version whose `validFrom` is not after the
/// requested time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticRoster {
    /// Team versions.
    pub teams: Vec<TeamEntry>,
    /// Player versions.
    pub players: Vec<PlayerEntry>,
}

impl StaticRoster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a roster from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a player version that is always valid.
    pub fn with_player(mut self, player: PlayerState) -> Self {
        self.players.push(PlayerEntry {
            player,
            valid_from: None,
        });
        self
    }

    /// Add a team version that is always valid.
    pub fn with_team(mut self, id: TeamId, nickname: impl Into<String>, pitcher: PlayerId, lineup: Vec<PlayerId>) -> Self {
        self.teams.push(TeamEntry {
            id,
            nickname: nickname.into(),
            pitcher,
            lineup,
            valid_from: None,
        });
        self
    }
}

fn latest_valid<'a, T>(
    entries: impl Iterator<Item = &'a T>,
    valid_from: impl Fn(&T) -> Option<DateTime<Utc>>,
    at: DateTime<Utc>,
) -> Option<&'a T>
where
    T: 'a,
{
    entries
        .filter(|e| valid_from(e).is_none_or(|from| from <= at))
        .max_by_key(|e| valid_from(e))
}

impl Roster for StaticRoster {
    fn team_at(&self, team: TeamId, at: DateTime<Utc>) -> CoreResult<TeamRecord> {
        let entry = latest_valid(self.teams.iter().filter(|t| t.id == team), |t| t.valid_from, at)
            .ok_or(CoreError::TeamNotFound(team))?;
        let lineup = entry
            .lineup
            .iter()
            .map(|id| self.player_at(*id, at))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(TeamRecord {
            id: entry.id,
            nickname: entry.nickname.clone(),
            pitcher: self.player_at(entry.pitcher, at)?,
            lineup,
        })
    }

    fn player_at(&self, player: PlayerId, at: DateTime<Utc>) -> CoreResult<PlayerState> {
        latest_valid(
            self.players.iter().filter(|p| p.player.id == player),
            |p| p.valid_from,
            at,
        )
        .map(|p| p.player.clone())
        .ok_or(CoreError::PlayerNotFound(player))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::player::COFFEE_RALLY;

    #[test]
    fn team_lookup_resolves_players() {
        let pitcher = PlayerState::new(PlayerId::new(), "Pitching Machine");
        let batter = PlayerState::new(PlayerId::new(), "Batter One");
        let team = TeamId::new();
        let roster = StaticRoster::new()
            .with_player(pitcher.clone())
            .with_player(batter.clone())
            .with_team(team, "Tacos", pitcher.id, vec![batter.id]);

        let record = roster.team_at(team, Utc::now()).unwrap();
        assert_eq!(record.nickname, "Tacos");
        assert_eq!(record.pitcher, pitcher);
        assert_eq!(record.lineup, vec![batter]);
    }

    #[test]
    fn latest_version_before_query_time_wins() {
        let id = PlayerId::new();
        let early = Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 3, 8, 0, 0, 0).unwrap();
        let mut roster = StaticRoster::new().with_player(PlayerState::new(id, "Original"));
        roster.players.push(PlayerEntry {
            player: PlayerState::new(id, "Original").with_mod(COFFEE_RALLY),
            valid_from: Some(late),
        });

        assert!(!roster.player_at(id, early).unwrap().has_mod(COFFEE_RALLY));
        assert!(roster.player_at(id, late).unwrap().has_mod(COFFEE_RALLY));
    }

    #[test]
    fn missing_team_is_an_error() {
        let roster = StaticRoster::new();
        assert!(matches!(
            roster.team_at(TeamId::new(), Utc::now()),
            Err(CoreError::TeamNotFound(_))
        ));
    }

    #[test]
    fn roster_parses_from_json() {
        let json = r#"{
            "players": [
                {"id": "00000000-0000-4000-8000-000000000001", "name": "Pitcher", "mods": ["COFFEE_RALLY"]},
                {"id": "00000000-0000-4000-8000-000000000002", "name": "Batter", "legacyItem": "Bat"}
            ],
            "teams": [
                {"id": "00000000-0000-4000-8000-0000000000aa", "nickname": "Tacos",
                 "pitcher": "00000000-0000-4000-8000-000000000001",
                 "lineup": ["00000000-0000-4000-8000-000000000002"]}
            ]
        }"#;
        let roster = StaticRoster::from_json(json).unwrap();
        let team = roster.teams[0].id;
        let record = roster.team_at(team, Utc::now()).unwrap();
        assert!(record.pitcher.has_mod(COFFEE_RALLY));
        assert_eq!(record.lineup[0].legacy_item.as_deref(), Some("Bat"));
    }
}
