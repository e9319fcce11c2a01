use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;

/// Position of an event within its game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventMetadata {
    /// Play index; the snapshot following this play has `playCount == play + 1`.
    pub play: i64,
    /// Order among events sharing a play.
    pub sub_play: i64,
}

/// One narrated action from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationEvent {
    /// Raw action-type code.
    #[serde(rename = "type")]
    pub code: i64,
    /// The narration sentence.
    pub description: String,
    /// Play and sub-play ordering.
    #[serde(default)]
    pub metadata: EventMetadata,
    /// Players the event refers to.
    #[serde(default)]
    pub player_tags: Vec<PlayerId>,
    /// When the event was emitted.
    pub created: DateTime<Utc>,
}

impl NarrationEvent {
    /// Create an event for an action.
    pub fn new(action: ActionKind, description: impl Into<String>, play: i64, created: DateTime<Utc>) -> Self {
        Self {
            code: action.code(),
            description: description.into(),
            metadata: EventMetadata { play, sub_play: 0 },
            player_tags: Vec::new(),
            created,
        }
    }

    /// Attach player tags.
    pub fn with_tags(mut self, tags: Vec<PlayerId>) -> Self {
        self.player_tags = tags;
        self
    }

    /// Decode the action-type code.
    pub fn action(&self) -> ActionKind {
        ActionKind::from_code(self.code)
    }
}

/// Decoded action-type code.
///
/// Codes with their own handling get a variant; everything else is kept as
/// [`ActionKind::Other`] so tables keyed on raw codes can still match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// 0: "Let's Go!"
    LetsGo,
    /// 1: "Play ball!"
    PlayBall,
    /// 2: "Top of 1, ... batting."
    HalfInningStart,
    /// 4: stolen base or caught stealing.
    StolenBase,
    /// 5: walk.
    Walk,
    /// 6: strikeout.
    Strikeout,
    /// 7: fly out.
    FlyOut,
    /// 8: ground out, double play, or fielder's choice.
    GroundOut,
    /// 9: home run.
    HomeRun,
    /// 10: base hit.
    Hit,
    /// 11: final score.
    GameEnd,
    /// 12: batter up.
    BatterUp,
    /// 13: strike.
    Strike,
    /// 14: ball.
    Ball,
    /// 15: foul ball.
    FoulBall,
    /// 23: batter skipped (shelled or elsewhere).
    ShelledBatter,
    /// 25: strike zapped by electricity.
    StrikeZapped,
    /// 27: mild pitch.
    MildPitch,
    /// 28: end of inning.
    InningEnd,
    /// 41: feedback swap.
    FeedbackSwap,
    /// 51: blooddrain.
    BlooddrainDrain,
    /// 52: siphon.
    BlooddrainSiphon,
    /// 53: blooddrain blocked.
    BlooddrainBlocked,
    /// 54: incineration.
    Incineration,
    /// 73: peanut flavor text.
    PeanutFlavor,
    /// 92: superyummy text.
    Superyummy,
    /// Any other code.
    Other(i64),
}

impl ActionKind {
    /// Decode a raw code.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::LetsGo,
            1 => Self::PlayBall,
            2 => Self::HalfInningStart,
            4 => Self::StolenBase,
            5 => Self::Walk,
            6 => Self::Strikeout,
            7 => Self::FlyOut,
            8 => Self::GroundOut,
            9 => Self::HomeRun,
            10 => Self::Hit,
            11 => Self::GameEnd,
            12 => Self::BatterUp,
            13 => Self::Strike,
            14 => Self::Ball,
            15 => Self::FoulBall,
            23 => Self::ShelledBatter,
            25 => Self::StrikeZapped,
            27 => Self::MildPitch,
            28 => Self::InningEnd,
            41 => Self::FeedbackSwap,
            51 => Self::BlooddrainDrain,
            52 => Self::BlooddrainSiphon,
            53 => Self::BlooddrainBlocked,
            54 => Self::Incineration,
            73 => Self::PeanutFlavor,
            92 => Self::Superyummy,
            other => Self::Other(other),
        }
    }

    /// The raw code.
    pub fn code(self) -> i64 {
        match self {
            Self::LetsGo => 0,
            Self::PlayBall => 1,
            Self::HalfInningStart => 2,
            Self::StolenBase => 4,
            Self::Walk => 5,
            Self::Strikeout => 6,
            Self::FlyOut => 7,
            Self::GroundOut => 8,
            Self::HomeRun => 9,
            Self::Hit => 10,
            Self::GameEnd => 11,
            Self::BatterUp => 12,
            Self::Strike => 13,
            Self::Ball => 14,
            Self::FoulBall => 15,
            Self::ShelledBatter => 23,
            Self::StrikeZapped => 25,
            Self::MildPitch => 27,
            Self::InningEnd => 28,
            Self::FeedbackSwap => 41,
            Self::BlooddrainDrain => 51,
            Self::BlooddrainSiphon => 52,
            Self::BlooddrainBlocked => 53,
            Self::Incineration => 54,
            Self::PeanutFlavor => 73,
            Self::Superyummy => 92,
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "action {code}"),
            known => write!(f, "{known:?} ({})", known.code()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_action_kind() {
        for code in 0..120 {
            assert_eq!(ActionKind::from_code(code).code(), code);
        }
    }

    #[test]
    fn unknown_codes_are_kept() {
        assert_eq!(ActionKind::from_code(62), ActionKind::Other(62));
        assert_eq!(ActionKind::Other(62).to_string(), "action 62");
    }

    #[test]
    fn event_deserializes_from_feed_json() {
        let json = r#"{
            "type": 12,
            "description": "Jessica Telephone batting for the Firefighters.",
            "metadata": {"play": 7, "subPlay": 0},
            "playerTags": ["e6d37189-3fff-45b2-a542-1266836a1f64"],
            "created": "2021-03-01T16:00:21.535Z"
        }"#;
        let event: NarrationEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.action(), ActionKind::BatterUp);
        assert_eq!(event.metadata.play, 7);
        assert_eq!(event.player_tags.len(), 1);
    }
}
