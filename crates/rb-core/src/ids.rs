use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub Uuid);

/// Unique identifier of a team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub Uuid);

/// Unique identifier of a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl GameId {
    /// Generate a new random game ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl TeamId {
    /// Generate a new random team ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl PlayerId {
    /// Generate a new random player ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_displays_short_form() {
        let id = PlayerId(Uuid::parse_str("e6d37189-3fff-95b2-a542-1266836a1f64").unwrap());
        assert_eq!(id.to_string(), "e6d37189");
    }

    #[test]
    fn ids_serialize_as_bare_uuid_strings() {
        let id = TeamId(Uuid::parse_str("259150c5-e086-4d6c-b2da-80b576885059").unwrap());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"259150c5-e086-4d6c-b2da-80b576885059\"");
        let back: TeamId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
