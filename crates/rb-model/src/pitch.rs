//! Recorded plate appearances and baserunning decisions.

use std::collections::BTreeMap;

use rb_core::PlayerId;
use serde::{Deserialize, Serialize};

/// What a single pitch led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchOutcome {
    /// A ball (walks and mild pitches included).
    Ball,
    /// A called or flinching strike.
    StrikeLooking,
    /// A swinging strike.
    StrikeSwinging,
    /// A foul ball.
    Foul,
    /// A base hit reaching the given base index (0 = single).
    Hit(i64),
    /// A home run.
    HomeRun,
    /// A fly out.
    Flyout,
    /// A ground out.
    GroundOut,
    /// A fielder's choice; the batter ended up on the given base index.
    FieldersChoice(i64),
    /// A double play.
    DoublePlay,
}

impl std::fmt::Display for PitchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ball => write!(f, "ball"),
            Self::StrikeLooking => write!(f, "strike looking"),
            Self::StrikeSwinging => write!(f, "strike swinging"),
            Self::Foul => write!(f, "foul"),
            Self::Hit(base) => write!(f, "hit to base {base}"),
            Self::HomeRun => write!(f, "home run"),
            Self::Flyout => write!(f, "flyout"),
            Self::GroundOut => write!(f, "ground out"),
            Self::FieldersChoice(base) => write!(f, "fielder's choice to base {base}"),
            Self::DoublePlay => write!(f, "double play"),
        }
    }
}

/// One recorded pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    /// The lineup batter at the plate.
    pub batter: PlayerId,
    /// How many times the lineup had turned over when this pitch came.
    pub appearance: u32,
    /// What happened.
    pub outcome: PitchOutcome,
    /// The narration it was recorded from.
    pub text: String,
    /// Bases each runner took beyond the play's guaranteed minimum.
    pub advancements: BTreeMap<PlayerId, i64>,
}

/// What a runner did with one chance to steal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StealDecision {
    /// Stayed put.
    Stay,
    /// Went and made it.
    Attempt,
    /// Went and was thrown out.
    Caught,
}

/// A steal decision tagged with the runner's team's lineup turnover count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealRecord {
    /// Lineup turnover count when the decision was made.
    pub appearance: u32,
    /// The decision.
    pub decision: StealDecision,
}
