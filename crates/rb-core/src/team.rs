use crate::error::{CoreError, CoreResult};
use crate::ids::{PlayerId, TeamId};
use crate::player::PlayerState;
use crate::roster::TeamRecord;

/// Mutable per-side roster view for one game.
///
/// Tracks the current pitcher, the batting order, which batter is up, and how
/// many times the order has wrapped around (the appearance counter).
#[derive(Debug, Clone, PartialEq)]
pub struct TeamState {
    /// The team's identifier.
    pub id: TeamId,
    /// Nickname used in "batting for the ..." narration.
    pub nickname: String,
    /// Current pitcher.
    pub pitcher: PlayerState,
    lineup: Vec<PlayerState>,
    batter_index: Option<usize>,
    appearance_count: u32,
}

impl TeamState {
    /// Create a team state. The lineup must not be empty.
    pub fn new(
        id: TeamId,
        nickname: impl Into<String>,
        pitcher: PlayerState,
        lineup: Vec<PlayerState>,
    ) -> CoreResult<Self> {
        if lineup.is_empty() {
            return Err(CoreError::EmptyLineup(id));
        }
        Ok(Self {
            id,
            nickname: nickname.into(),
            pitcher,
            lineup,
            batter_index: None,
            appearance_count: 0,
        })
    }

    /// Build from a roster record.
    pub fn from_record(record: TeamRecord) -> CoreResult<Self> {
        Self::new(record.id, record.nickname, record.pitcher, record.lineup)
    }

    /// The batting order.
    pub fn lineup(&self) -> &[PlayerState] {
        &self.lineup
    }

    /// Mutable access to the batting order.
    pub fn lineup_mut(&mut self) -> &mut [PlayerState] {
        &mut self.lineup
    }

    /// Index of the current batter, `None` before the first batter is up.
    pub fn batter_index(&self) -> Option<usize> {
        self.batter_index
    }

    /// Number of completed passes through the batting order.
    pub fn appearance_count(&self) -> u32 {
        self.appearance_count
    }

    /// Move to the next batter, wrapping (and counting the wrap) at the end.
    pub fn advance_batter(&mut self) {
        self.batter_index = match self.batter_index {
            None => Some(0),
            Some(i) if i + 1 >= self.lineup.len() => {
                self.appearance_count += 1;
                Some(0)
            }
            Some(i) => Some(i + 1),
        };
    }

    /// Step back one batter so the current batter comes up again next.
    ///
    /// The appearance counter is left alone: re-advancing onto index 0 from
    /// the "before first" position does not count as a wrap.
    pub fn rewind_batter(&mut self) {
        self.batter_index = match self.batter_index {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    /// The current batter, if one is up.
    pub fn batter(&self) -> Option<&PlayerState> {
        self.batter_index.and_then(|i| self.lineup.get(i))
    }

    /// The batter who comes up after the current one.
    pub fn next_batter(&self) -> &PlayerState {
        let next = match self.batter_index {
            Some(i) if i + 1 < self.lineup.len() => i + 1,
            _ => 0,
        };
        &self.lineup[next]
    }

    /// Lineup players with the given display name.
    pub fn players_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PlayerState> + 'a {
        self.lineup.iter().filter(move |p| p.name == name)
    }

    /// Replace a player (lineup slot or pitcher) in place.
    ///
    /// Returns whether the departing player was found. Counters are untouched.
    pub fn replace_player(&mut self, departing: PlayerId, replacement: &PlayerState) -> bool {
        let mut found = false;
        if self.pitcher.id == departing {
            self.pitcher = replacement.clone();
            found = true;
        }
        for slot in self.lineup.iter_mut().filter(|p| p.id == departing) {
            *slot = replacement.clone();
            found = true;
        }
        found
    }
}
