//! Typed sentence trees, one type per action family.
//!
//! Every tree renders back to the canonical feed sentence through `Display`.

use std::fmt;

/// A named base, as it appears in steal and fielder's choice sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// Base index 0.
    First,
    /// Base index 1.
    Second,
    /// Base index 2.
    Third,
    /// Base index 3.
    Fourth,
}

impl Base {
    /// Zero-based base index.
    pub fn index(self) -> i64 {
        match self {
            Base::First => 0,
            Base::Second => 1,
            Base::Third => 2,
            Base::Fourth => 3,
        }
    }

    /// The base with this index, if it has a name.
    pub fn from_index(index: i64) -> Option<Base> {
        match index {
            0 => Some(Base::First),
            1 => Some(Base::Second),
            2 => Some(Base::Third),
            3 => Some(Base::Fourth),
            _ => None,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Base::First => "first",
            Base::Second => "second",
            Base::Third => "third",
            Base::Fourth => "fourth",
        };
        write!(f, "{name}")
    }
}

/// How far a hit takes the batter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Batter reaches base index 0.
    Single,
    /// Batter reaches base index 1.
    Double,
    /// Batter reaches base index 2.
    Triple,
    /// Batter reaches base index 3.
    Quadruple,
}

impl HitKind {
    /// Base index the batter lands on.
    pub fn base_index(self) -> i64 {
        match self {
            HitKind::Single => 0,
            HitKind::Double => 1,
            HitKind::Triple => 2,
            HitKind::Quadruple => 3,
        }
    }

    /// The hit that lands the batter on a base index.
    pub fn from_base_index(index: i64) -> Option<HitKind> {
        match index {
            0 => Some(HitKind::Single),
            1 => Some(HitKind::Double),
            2 => Some(HitKind::Triple),
            3 => Some(HitKind::Quadruple),
            _ => None,
        }
    }
}

impl fmt::Display for HitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// `Top of 3, Unlimited Tacos batting.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfInning {
    /// Top (away batting) or bottom half.
    pub top: bool,
    /// One-based inning number.
    pub inning: i64,
    /// Full name of the batting team.
    pub team: String,
}

/// `X is Inhabiting Y!` prefix of a batter-up sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inhabiting {
    /// The haunting player who actually bats.
    pub haunter: String,
    /// The lineup player being inhabited.
    pub haunted: String,
}

/// `X batting for the Tacos, wielding Y.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatterUp {
    /// Haunting clause, if any.
    pub inhabiting: Option<Inhabiting>,
    /// Batter name.
    pub batter: String,
    /// Team nickname.
    pub team: String,
    /// Wielded legacy item.
    pub wielding: Option<String>,
}

/// Stolen base or caught stealing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Steal {
    /// `X steals second base!`
    Stolen {
        /// Runner name.
        runner: String,
        /// Base stolen.
        base: Base,
        /// `X scores with Blaserunning!` clause, naming the runner.
        blaserunning: Option<String>,
        /// Free refills used.
        refills: Vec<String>,
    },
    /// `X gets caught stealing third base.`
    Caught {
        /// Runner name.
        runner: String,
        /// Base attempted.
        base: Base,
    },
}

/// Every out or advance narrated as a fielding play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldingOut {
    /// `X hit a ground out to Y.`
    GroundOut {
        /// Batter name.
        batter: String,
        /// Fielder name.
        fielder: String,
        /// Runners scoring on the sacrifice.
        sacrifices: Vec<String>,
        /// Free refills used.
        refills: Vec<String>,
    },
    /// `X hit a flyout to Y.`
    Flyout {
        /// Batter name.
        batter: String,
        /// Fielder name.
        fielder: String,
        /// Runners tagging up to score.
        tag_ups: Vec<String>,
        /// Free refills used.
        refills: Vec<String>,
    },
    /// `X hit into a double play!`
    DoublePlay {
        /// Batter name.
        batter: String,
        /// Runners scoring.
        scores: Vec<String>,
        /// Free refills used.
        refills: Vec<String>,
    },
    /// `Y out at second base.` ... `X reaches on fielder's choice.`
    FieldersChoice {
        /// Runner put out.
        runner_out: String,
        /// Base the runner was forced to.
        base: Base,
        /// Runners scoring.
        scores: Vec<String>,
        /// Free refills used.
        refills: Vec<String>,
        /// Batter name.
        batter: String,
    },
}

impl FieldingOut {
    /// Batter named by the sentence.
    pub fn batter(&self) -> &str {
        match self {
            FieldingOut::GroundOut { batter, .. }
            | FieldingOut::Flyout { batter, .. }
            | FieldingOut::DoublePlay { batter, .. }
            | FieldingOut::FieldersChoice { batter, .. } => batter,
        }
    }

    /// Runners named as scoring.
    pub fn scorers(&self) -> &[String] {
        match self {
            FieldingOut::GroundOut { sacrifices, .. } => sacrifices,
            FieldingOut::Flyout { tag_ups, .. } => tag_ups,
            FieldingOut::DoublePlay { scores, .. } | FieldingOut::FieldersChoice { scores, .. } => scores,
        }
    }

    /// Free refills used.
    pub fn refills(&self) -> &[String] {
        match self {
            FieldingOut::GroundOut { refills, .. }
            | FieldingOut::Flyout { refills, .. }
            | FieldingOut::DoublePlay { refills, .. }
            | FieldingOut::FieldersChoice { refills, .. } => refills,
        }
    }
}

/// `X hits a Double!`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Batter name.
    pub batter: String,
    /// Kind of hit.
    pub kind: HitKind,
    /// `X is Heating Up!` clause, naming the batter.
    pub heating_up: Option<String>,
    /// Runners scoring.
    pub scores: Vec<String>,
    /// Free refills used.
    pub refills: Vec<String>,
}

/// `X hits a solo home run!`, `X hits a 3-run home run!`, `X hits a grand slam!`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRun {
    /// Batter name.
    pub batter: String,
    /// Runs driven in, batter included.
    pub runs: i64,
    /// Free refills used.
    pub refills: Vec<String>,
}

/// `X draws a walk.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walk {
    /// Batter name.
    pub batter: String,
    /// Runners forced home.
    pub scores: Vec<String>,
    /// Free refills used.
    pub refills: Vec<String>,
}

/// Strikeout sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strikeout {
    /// `X strikes out swinging.`
    Swinging {
        /// Batter name.
        batter: String,
    },
    /// `X strikes out looking.`
    Looking {
        /// Batter name.
        batter: String,
    },
    /// `P charmed X!` / `X swings 3 times to strike out willingly!`
    Charmed {
        /// Charming pitcher.
        pitcher: String,
        /// Charmed batter.
        batter: String,
        /// Swings taken.
        swings: i64,
    },
}

impl Strikeout {
    /// Batter named by the sentence.
    pub fn batter(&self) -> &str {
        match self {
            Strikeout::Swinging { batter } | Strikeout::Looking { batter } | Strikeout::Charmed { batter, .. } => {
                batter
            }
        }
    }
}

/// Umpire call on a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeCall {
    /// `Strike, swinging.`
    Swinging,
    /// `Strike, looking.`
    Looking,
    /// `Strike, flinching.`
    Flinching,
}

impl fmt::Display for StrikeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrikeCall::Swinging => write!(f, "swinging"),
            StrikeCall::Looking => write!(f, "looking"),
            StrikeCall::Flinching => write!(f, "flinching"),
        }
    }
}

/// Ball/strike count sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    /// `Ball. 1-0`
    Ball {
        /// Balls after the pitch.
        balls: i64,
        /// Strikes after the pitch.
        strikes: i64,
    },
    /// `Strike, swinging. 0-1`
    Strike {
        /// Umpire call.
        call: StrikeCall,
        /// Balls after the pitch.
        balls: i64,
        /// Strikes after the pitch.
        strikes: i64,
    },
    /// `Foul Ball. 0-2`
    Foul {
        /// Balls after the pitch.
        balls: i64,
        /// Strikes after the pitch.
        strikes: i64,
    },
}

impl Count {
    /// `(balls, strikes)` after the pitch.
    pub fn count(self) -> (i64, i64) {
        match self {
            Count::Ball { balls, strikes } | Count::Strike { balls, strikes, .. } | Count::Foul { balls, strikes } => {
                (balls, strikes)
            }
        }
    }
}

/// What a mild pitch amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MildPitchOutcome {
    /// `Ball, 2-1.`
    Ball {
        /// Balls after the pitch.
        balls: i64,
        /// Strikes after the pitch.
        strikes: i64,
        /// `Runners advance on the pathetic play!`
        runners_advance: bool,
    },
    /// `X draws a walk.`
    Walk {
        /// Batter name.
        batter: String,
    },
}

/// `P throws a Mild pitch!` followed by its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MildPitch {
    /// Pitcher name.
    pub pitcher: String,
    /// Ball or walk.
    pub outcome: MildPitchOutcome,
    /// Runners scoring.
    pub scores: Vec<String>,
}

/// What a siphon does with the drained blood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiphonEffect {
    /// `adds a Ball!`
    AddBall,
    /// `removes a Ball!`
    RemoveBall,
    /// `adds a Strike!`
    AddStrike,
    /// `removes a Strike!`
    RemoveStrike,
    /// `adds a Out!`
    AddOut,
    /// `removes a Out!`
    RemoveOut,
}

impl fmt::Display for SiphonEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SiphonEffect::AddBall => "adds a Ball!",
            SiphonEffect::RemoveBall => "removes a Ball!",
            SiphonEffect::AddStrike => "adds a Strike!",
            SiphonEffect::RemoveStrike => "removes a Strike!",
            SiphonEffect::AddOut => "adds a Out!",
            SiphonEffect::RemoveOut => "removes a Out!",
        };
        write!(f, "{text}")
    }
}

/// Blooddrain sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blooddrain {
    /// A siphon spending the blood on the game state.
    Siphon {
        /// Draining player.
        sipper: String,
        /// Drained player.
        target: String,
        /// Attribute category drained.
        category: String,
        /// Effect on the count or outs.
        effect: SiphonEffect,
        /// Batter struck out by an added strike.
        struck_out: Option<String>,
    },
    /// A drain that only moves attribute points.
    Drain {
        /// Draining player.
        sipper: String,
        /// Drained player.
        target: String,
        /// Attribute category drained.
        category: String,
        /// Whether the drain came from a Siphon.
        siphon: bool,
    },
    /// A drain blocked by Sealant.
    Sealed {
        /// Would-be draining player.
        sipper: String,
        /// Sealed player.
        target: String,
    },
}

/// Any parsed sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Sentence {
    HalfInning(HalfInning),
    BatterUp(BatterUp),
    Steal(Steal),
    FieldingOut(FieldingOut),
    Hit(Hit),
    HomeRun(HomeRun),
    Walk(Walk),
    Strikeout(Strikeout),
    Count(Count),
    MildPitch(MildPitch),
    Blooddrain(Blooddrain),
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn write_clauses(f: &mut fmt::Formatter<'_>, names: &[String], suffix: &str) -> fmt::Result {
    for name in names {
        write!(f, "\n{name} {suffix}")?;
    }
    Ok(())
}

fn write_refills(f: &mut fmt::Formatter<'_>, refills: &[String]) -> fmt::Result {
    for name in refills {
        write!(f, "\n{name} used their Free Refill.\n{name} Refills the In!")?;
    }
    Ok(())
}

impl fmt::Display for HalfInning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let half = if self.top { "Top" } else { "Bottom" };
        write!(f, "{half} of {}, {} batting.", self.inning, self.team)
    }
}

impl fmt::Display for BatterUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(Inhabiting { haunter, haunted }) = &self.inhabiting {
            writeln!(f, "{haunter} is Inhabiting {haunted}!")?;
        }
        write!(f, "{} batting for the {}", self.batter, self.team)?;
        if let Some(item) = &self.wielding {
            write!(f, ", wielding {item}")?;
        }
        write!(f, ".")
    }
}

impl fmt::Display for Steal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Steal::Stolen {
                runner,
                base,
                blaserunning,
                refills,
            } => {
                write!(f, "{runner} steals {base} base!")?;
                if let Some(name) = blaserunning {
                    write!(f, "\n{name} scores with Blaserunning!")?;
                }
                write_refills(f, refills)
            }
            Steal::Caught { runner, base } => write!(f, "{runner} gets caught stealing {base} base."),
        }
    }
}

impl fmt::Display for FieldingOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldingOut::GroundOut {
                batter,
                fielder,
                sacrifices,
                refills,
            } => {
                write!(f, "{batter} hit a ground out to {fielder}.")?;
                write_clauses(f, sacrifices, "advances on the sacrifice.")?;
                write_refills(f, refills)
            }
            FieldingOut::Flyout {
                batter,
                fielder,
                tag_ups,
                refills,
            } => {
                write!(f, "{batter} hit a flyout to {fielder}.")?;
                write_clauses(f, tag_ups, "tags up and scores!")?;
                write_refills(f, refills)
            }
            FieldingOut::DoublePlay {
                batter,
                scores,
                refills,
            } => {
                write!(f, "{batter} hit into a double play!")?;
                write_clauses(f, scores, "scores!")?;
                write_refills(f, refills)
            }
            FieldingOut::FieldersChoice {
                runner_out,
                base,
                scores,
                refills,
                batter,
            } => {
                write!(f, "{runner_out} out at {base} base.")?;
                write_clauses(f, scores, "scores!")?;
                write_refills(f, refills)?;
                write!(f, "\n{batter} reaches on fielder's choice.")
            }
        }
    }
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hits a {}!", self.batter, self.kind)?;
        if let Some(name) = &self.heating_up {
            write!(f, "\n{name} is Heating Up!")?;
        }
        write_clauses(f, &self.scores, "scores!")?;
        write_refills(f, &self.refills)
    }
}

impl fmt::Display for HomeRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.runs {
            1 => write!(f, "{} hits a solo home run!", self.batter)?,
            4 => write!(f, "{} hits a grand slam!", self.batter)?,
            n => write!(f, "{} hits a {n}-run home run!", self.batter)?,
        }
        write_refills(f, &self.refills)
    }
}

impl fmt::Display for Walk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} draws a walk.", self.batter)?;
        write_clauses(f, &self.scores, "scores!")?;
        write_refills(f, &self.refills)
    }
}

impl fmt::Display for Strikeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strikeout::Swinging { batter } => write!(f, "{batter} strikes out swinging."),
            Strikeout::Looking { batter } => write!(f, "{batter} strikes out looking."),
            Strikeout::Charmed {
                pitcher,
                batter,
                swings,
            } => write!(
                f,
                "{pitcher} charmed {batter}!\n{batter} swings {swings} times to strike out willingly!"
            ),
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::Ball { balls, strikes } => write!(f, "Ball. {balls}-{strikes}"),
            Count::Strike { call, balls, strikes } => write!(f, "Strike, {call}. {balls}-{strikes}"),
            Count::Foul { balls, strikes } => write!(f, "Foul Ball. {balls}-{strikes}"),
        }
    }
}

impl fmt::Display for MildPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} throws a Mild pitch!", self.pitcher)?;
        match &self.outcome {
            MildPitchOutcome::Ball {
                balls,
                strikes,
                runners_advance,
            } => {
                write!(f, "\nBall, {balls}-{strikes}.")?;
                if *runners_advance {
                    write!(f, "\nRunners advance on the pathetic play!")?;
                }
            }
            MildPitchOutcome::Walk { batter } => write!(f, "\n{batter} draws a walk.")?,
        }
        write_clauses(f, &self.scores, "scores!")
    }
}

impl fmt::Display for Blooddrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "The Blooddrain gurgled!")?;
        match self {
            Blooddrain::Siphon {
                sipper,
                target,
                category,
                effect,
                struck_out,
            } => {
                write!(
                    f,
                    "\n{sipper}'s Siphon activates!\n{sipper} siphoned some of {target}'s {category} ability!\n{sipper} {effect}"
                )?;
                if let Some(batter) = struck_out {
                    write!(f, "\n{batter} strikes out looking.")?;
                }
                Ok(())
            }
            Blooddrain::Drain {
                sipper,
                target,
                category,
                siphon,
            } => {
                if *siphon {
                    write!(f, "\n{sipper}'s Siphon activates!")?;
                }
                write!(
                    f,
                    "\n{sipper} siphoned some of {target}'s {category} ability!\n{sipper} increased their {category} ability!"
                )
            }
            Blooddrain::Sealed { sipper, target } => {
                write!(f, "\n{sipper} tried to siphon blood from {target}, but they were Sealed!")
            }
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::HalfInning(s) => s.fmt(f),
            Sentence::BatterUp(s) => s.fmt(f),
            Sentence::Steal(s) => s.fmt(f),
            Sentence::FieldingOut(s) => s.fmt(f),
            Sentence::Hit(s) => s.fmt(f),
            Sentence::HomeRun(s) => s.fmt(f),
            Sentence::Walk(s) => s.fmt(f),
            Sentence::Strikeout(s) => s.fmt(f),
            Sentence::Count(s) => s.fmt(f),
            Sentence::MildPitch(s) => s.fmt(f),
            Sentence::Blooddrain(s) => s.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn render_half_inning() {
        let s = HalfInning {
            top: false,
            inning: 9,
            team: "Baltimore Crabs".into(),
        };
        assert_snapshot!(s.to_string(), @"Bottom of 9, Baltimore Crabs batting.");
    }

    #[test]
    fn render_batter_up_with_item() {
        let s = BatterUp {
            inhabiting: None,
            batter: "Nagomi Mcdaniel".into(),
            team: "Pies".into(),
            wielding: Some("Inflatable Sunglasses".into()),
        };
        assert_snapshot!(s.to_string(), @"Nagomi Mcdaniel batting for the Pies, wielding Inflatable Sunglasses.");
    }

    #[test]
    fn render_home_run_kinds() {
        let mut hr = HomeRun {
            batter: "Aldon Cashmoney".into(),
            runs: 1,
            refills: vec![],
        };
        assert_snapshot!(hr.to_string(), @"Aldon Cashmoney hits a solo home run!");
        hr.runs = 3;
        assert_snapshot!(hr.to_string(), @"Aldon Cashmoney hits a 3-run home run!");
        hr.runs = 4;
        assert_snapshot!(hr.to_string(), @"Aldon Cashmoney hits a grand slam!");
    }

    #[test]
    fn render_count() {
        let s = Count::Strike {
            call: StrikeCall::Flinching,
            balls: 0,
            strikes: 1,
        };
        assert_snapshot!(s.to_string(), @"Strike, flinching. 0-1");
    }

    #[test]
    fn render_fielders_choice_puts_reach_last() {
        let s = FieldingOut::FieldersChoice {
            runner_out: "Jessica Telephone".into(),
            base: Base::Second,
            scores: vec!["Ed Helmuth".into()],
            refills: vec![],
            batter: "Hewitt Best".into(),
        };
        assert_eq!(
            s.to_string(),
            "Jessica Telephone out at second base.\nEd Helmuth scores!\nHewitt Best reaches on fielder's choice."
        );
    }

    #[test]
    fn render_siphon_with_strikeout() {
        let s = Blooddrain::Siphon {
            sipper: "Sixpack Dogwalker".into(),
            target: "Jaylen Hotdogfingers".into(),
            category: "pitching".into(),
            effect: SiphonEffect::AddStrike,
            struck_out: Some("Jaylen Hotdogfingers".into()),
        };
        assert_eq!(
            s.to_string(),
            "The Blooddrain gurgled!\nSixpack Dogwalker's Siphon activates!\nSixpack Dogwalker siphoned some of Jaylen Hotdogfingers's pitching ability!\nSixpack Dogwalker adds a Strike!\nJaylen Hotdogfingers strikes out looking."
        );
    }

    #[test]
    fn base_and_hit_indices_agree() {
        for i in 0..4 {
            assert_eq!(Base::from_index(i).unwrap().index(), i);
            assert_eq!(HitKind::from_base_index(i).unwrap().base_index(), i);
        }
        assert!(Base::from_index(4).is_none());
    }
}
