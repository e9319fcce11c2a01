//! Chumsky grammars for the narration sentence families.
//!
//! Names are greedy runs of words that stop where the next fixed phrase of the
//! template begins, so player and team names may contain any number of words.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::lexer::{self, Token};

type Span = SimpleSpan;
type Extra<'a> = extra::Err<Rich<'a, Token>>;

/// Token input over narration text.
trait TokenInput<'a>: ValueInput<'a, Token = Token, Span = Span> {}

impl<'a, I> TokenInput<'a> for I where I: ValueInput<'a, Token = Token, Span = Span> {}

/// Sentence families with a structured grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Half-inning start.
    HalfInning,
    /// Batter up.
    BatterUp,
    /// Stolen base or caught stealing.
    Steal,
    /// Ground out, flyout, double play, fielder's choice.
    FieldingOut,
    /// Single through quadruple.
    Hit,
    /// Home runs.
    HomeRun,
    /// Walk.
    Walk,
    /// Strikeouts.
    Strikeout,
    /// Ball, strike, foul.
    Count,
    /// Mild pitch.
    MildPitch,
    /// Blooddrain.
    Blooddrain,
}

impl Family {
    /// Every family, in action-code order.
    pub const ALL: [Family; 11] = [
        Family::HalfInning,
        Family::BatterUp,
        Family::Steal,
        Family::FieldingOut,
        Family::Hit,
        Family::HomeRun,
        Family::Walk,
        Family::Strikeout,
        Family::Count,
        Family::MildPitch,
        Family::Blooddrain,
    ];

    /// Kebab-case family name.
    pub fn name(self) -> &'static str {
        match self {
            Family::HalfInning => "half-inning",
            Family::BatterUp => "batter-up",
            Family::Steal => "steal",
            Family::FieldingOut => "fielding-out",
            Family::Hit => "hit",
            Family::HomeRun => "home-run",
            Family::Walk => "walk",
            Family::Strikeout => "strikeout",
            Family::Count => "count",
            Family::MildPitch => "mild-pitch",
            Family::Blooddrain => "blooddrain",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Family::ALL.iter().map(|f| f.name()).collect();
                format!("unknown sentence family '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// A sentence that does not match its family's template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot parse {family} sentence: {message}")]
pub struct ParseError {
    /// Family the sentence was parsed as.
    pub family: Family,
    /// The offending text.
    pub text: String,
    /// Byte range of the first failure.
    pub span: Range<usize>,
    /// Every failure, joined.
    pub message: String,
}

/// Result alias for sentence parsing.
pub type ParseResult<T> = Result<T, ParseError>;

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

fn word<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, String, Extra<'a>> + Clone {
    select! { Token::Word(w) => w }.labelled("word")
}

fn kw<'a, I: TokenInput<'a>>(k: &'static str) -> impl Parser<'a, I, (), Extra<'a>> + Clone {
    select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k)
}

fn integer<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, i64, Extra<'a>> + Clone {
    select! { Token::Integer(n) => n }.labelled("integer")
}

/// A fixed run of words, e.g. `batting for the`.
fn phrase<'a, I: TokenInput<'a>>(text: &'static str) -> impl Parser<'a, I, (), Extra<'a>> + Clone {
    let expected: Vec<&'static str> = text.split(' ').collect();
    word()
        .repeated()
        .exactly(expected.len())
        .collect::<Vec<String>>()
        .try_map(move |got, span| {
            if got.iter().map(String::as_str).eq(expected.iter().copied()) {
                Ok(())
            } else {
                Err(Rich::custom(span, format!("expected \"{text}\"")))
            }
        })
}

/// Words up to, but not including, the point where `stop` matches.
fn name_before<'a, I, S>(stop: S) -> impl Parser<'a, I, String, Extra<'a>> + Clone
where
    I: TokenInput<'a>,
    S: Parser<'a, I, (), Extra<'a>> + Clone,
{
    word()
        .and_is(stop.not())
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|words| words.join(" "))
        .labelled("name")
}

/// Words up to the next punctuation.
fn plain_name<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, String, Extra<'a>> + Clone {
    word()
        .repeated()
        .at_least(1)
        .collect::<Vec<String>>()
        .map(|words| words.join(" "))
        .labelled("name")
}

/// `Jaylen Hotdogfingers's`, returned without the trailing `'s`.
fn possessive_name<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, String, Extra<'a>> + Clone {
    let possessive = select! { Token::Word(w) if w.ends_with("'s") => w };
    word()
        .and_is(possessive.clone().not())
        .repeated()
        .collect::<Vec<String>>()
        .then(possessive)
        .map(|(mut words, last)| {
            let stem = last.strip_suffix("'s").unwrap_or(&last).to_string();
            words.push(stem);
            words.join(" ")
        })
        .labelled("possessive name")
}

fn base<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Base, Extra<'a>> + Clone {
    select! {
        Token::Word(ref w) if w.as_str() == "first" => Base::First,
        Token::Word(ref w) if w.as_str() == "second" => Base::Second,
        Token::Word(ref w) if w.as_str() == "third" => Base::Third,
        Token::Word(ref w) if w.as_str() == "fourth" => Base::Fourth,
    }
    .labelled("base")
}

/// `2-1`
fn count_pair<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, (i64, i64), Extra<'a>> + Clone {
    integer().then_ignore(just(Token::Dash)).then(integer())
}

/// `\n{name} {suffix}` closed by `end`.
fn clause<'a, I: TokenInput<'a>>(suffix: &'static str, end: Token) -> impl Parser<'a, I, String, Extra<'a>> + Clone {
    just(Token::Newline)
        .ignore_then(name_before(phrase(suffix)))
        .then_ignore(phrase(suffix))
        .then_ignore(just(end))
}

fn scores<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Vec<String>, Extra<'a>> + Clone {
    clause("scores", Token::Bang).repeated().collect()
}

/// `\nX used their Free Refill.\nX Refills the In!`, any number of times.
fn refills<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Vec<String>, Extra<'a>> + Clone {
    clause("used their Free Refill", Token::Period)
        .then(clause("Refills the In", Token::Bang))
        .try_map(|(used, refilled), span| {
            if used == refilled {
                Ok(used)
            } else {
                Err(Rich::custom(span, format!("refill names differ: {used} / {refilled}")))
            }
        })
        .repeated()
        .collect()
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

fn half_inning<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, HalfInning, Extra<'a>> + Clone {
    let batting = kw("batting").then(just(Token::Period)).ignored();
    choice((kw("Top").to(true), kw("Bottom").to(false)))
        .then_ignore(kw("of"))
        .then(integer())
        .then_ignore(just(Token::Comma))
        .then(name_before(batting.clone()))
        .then_ignore(batting)
        .map(|((top, inning), team)| HalfInning { top, inning, team })
}

fn batter_up<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, BatterUp, Extra<'a>> + Clone {
    let inhabiting = name_before(phrase("is Inhabiting"))
        .then_ignore(phrase("is Inhabiting"))
        .then(plain_name())
        .then_ignore(just(Token::Bang))
        .then_ignore(just(Token::Newline))
        .map(|(haunter, haunted)| Inhabiting { haunter, haunted });

    let wielding = just(Token::Comma).ignore_then(kw("wielding")).ignore_then(plain_name());

    inhabiting
        .or_not()
        .then(name_before(phrase("batting for the")))
        .then_ignore(phrase("batting for the"))
        .then(plain_name())
        .then(wielding.or_not())
        .then_ignore(just(Token::Period))
        .map(|(((inhabiting, batter), team), wielding)| BatterUp {
            inhabiting,
            batter,
            team,
            wielding,
        })
}

fn steal<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Steal, Extra<'a>> + Clone {
    let stolen = name_before(kw("steals"))
        .then_ignore(kw("steals"))
        .then(base())
        .then_ignore(kw("base"))
        .then_ignore(just(Token::Bang))
        .then(clause("scores with Blaserunning", Token::Bang).or_not())
        .then(refills())
        .map(|(((runner, base), blaserunning), refills)| Steal::Stolen {
            runner,
            base,
            blaserunning,
            refills,
        });

    let caught = name_before(phrase("gets caught stealing"))
        .then_ignore(phrase("gets caught stealing"))
        .then(base())
        .then_ignore(kw("base"))
        .then_ignore(just(Token::Period))
        .map(|(runner, base)| Steal::Caught { runner, base });

    choice((stolen, caught))
}

fn fielding_out<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, FieldingOut, Extra<'a>> + Clone {
    let ground_out = name_before(phrase("hit a ground out to"))
        .then_ignore(phrase("hit a ground out to"))
        .then(plain_name())
        .then_ignore(just(Token::Period))
        .then(clause("advances on the sacrifice", Token::Period).repeated().collect())
        .then(refills())
        .map(|(((batter, fielder), sacrifices), refills)| FieldingOut::GroundOut {
            batter,
            fielder,
            sacrifices,
            refills,
        });

    let flyout = name_before(phrase("hit a flyout to"))
        .then_ignore(phrase("hit a flyout to"))
        .then(plain_name())
        .then_ignore(just(Token::Period))
        .then(clause("tags up and scores", Token::Bang).repeated().collect())
        .then(refills())
        .map(|(((batter, fielder), tag_ups), refills)| FieldingOut::Flyout {
            batter,
            fielder,
            tag_ups,
            refills,
        });

    let double_play = name_before(phrase("hit into a double play"))
        .then_ignore(phrase("hit into a double play"))
        .then_ignore(just(Token::Bang))
        .then(scores())
        .then(refills())
        .map(|((batter, scores), refills)| FieldingOut::DoublePlay {
            batter,
            scores,
            refills,
        });

    let fielders_choice = name_before(phrase("out at"))
        .then_ignore(phrase("out at"))
        .then(base())
        .then_ignore(kw("base"))
        .then_ignore(just(Token::Period))
        .then(scores())
        .then(refills())
        .then(clause("reaches on fielder's choice", Token::Period))
        .map(
            |((((runner_out, base), scores), refills), batter)| FieldingOut::FieldersChoice {
                runner_out,
                base,
                scores,
                refills,
                batter,
            },
        );

    choice((ground_out, flyout, double_play, fielders_choice))
}

fn hit<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Hit, Extra<'a>> + Clone {
    let kind = select! {
        Token::Word(ref w) if w.as_str() == "Single" => HitKind::Single,
        Token::Word(ref w) if w.as_str() == "Double" => HitKind::Double,
        Token::Word(ref w) if w.as_str() == "Triple" => HitKind::Triple,
        Token::Word(ref w) if w.as_str() == "Quadruple" => HitKind::Quadruple,
    }
    .labelled("hit kind");
    let heating = clause("is Heating Up", Token::Bang);

    name_before(phrase("hits a"))
        .then_ignore(phrase("hits a"))
        .then(kind)
        .then_ignore(just(Token::Bang))
        .then(heating.clone().or_not())
        .then(scores())
        .then(refills())
        .then(heating.or_not())
        .map(|(((((batter, kind), heating_before), scores), refills), heating_after)| Hit {
            batter,
            kind,
            heating_up: heating_before.or(heating_after),
            scores,
            refills,
        })
}

fn home_run<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, HomeRun, Extra<'a>> + Clone {
    let runs = choice((
        phrase("solo home run").to(1),
        phrase("grand slam").to(4),
        integer()
            .then_ignore(just(Token::Dash))
            .then_ignore(phrase("run home run")),
    ));

    name_before(phrase("hits a"))
        .then_ignore(phrase("hits a"))
        .then(runs)
        .then_ignore(just(Token::Bang))
        .then(refills())
        .map(|((batter, runs), refills)| HomeRun { batter, runs, refills })
}

fn walk<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Walk, Extra<'a>> + Clone {
    name_before(phrase("draws a walk"))
        .then_ignore(phrase("draws a walk"))
        .then_ignore(just(Token::Period))
        .then(scores())
        .then(refills())
        .map(|((batter, scores), refills)| Walk { batter, scores, refills })
}

fn strikeout<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Strikeout, Extra<'a>> + Clone {
    let plain = name_before(phrase("strikes out"))
        .then_ignore(phrase("strikes out"))
        .then(choice((kw("swinging").to(true), kw("looking").to(false))))
        .then_ignore(just(Token::Period))
        .map(|(batter, swinging)| {
            if swinging {
                Strikeout::Swinging { batter }
            } else {
                Strikeout::Looking { batter }
            }
        });

    let charmed = name_before(kw("charmed"))
        .then_ignore(kw("charmed"))
        .then(plain_name())
        .then_ignore(just(Token::Bang))
        .then_ignore(just(Token::Newline))
        .then(name_before(kw("swings")))
        .then_ignore(kw("swings"))
        .then(integer())
        .then_ignore(phrase("times to strike out willingly"))
        .then_ignore(just(Token::Bang))
        .try_map(|(((pitcher, batter), swinger), swings), span| {
            if batter == swinger {
                Ok(Strikeout::Charmed {
                    pitcher,
                    batter,
                    swings,
                })
            } else {
                Err(Rich::custom(span, format!("charmed {batter} but {swinger} swings")))
            }
        });

    choice((plain, charmed))
}

fn count<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Count, Extra<'a>> + Clone {
    let call = select! {
        Token::Word(ref w) if w.as_str() == "swinging" => StrikeCall::Swinging,
        Token::Word(ref w) if w.as_str() == "looking" => StrikeCall::Looking,
        Token::Word(ref w) if w.as_str() == "flinching" => StrikeCall::Flinching,
    }
    .labelled("strike call");

    let ball = kw("Ball")
        .ignore_then(just(Token::Period))
        .ignore_then(count_pair())
        .map(|(balls, strikes)| Count::Ball { balls, strikes });
    let strike = kw("Strike")
        .ignore_then(just(Token::Comma))
        .ignore_then(call)
        .then_ignore(just(Token::Period))
        .then(count_pair())
        .map(|(call, (balls, strikes))| Count::Strike { call, balls, strikes });
    let foul = phrase("Foul Ball")
        .ignore_then(just(Token::Period))
        .ignore_then(count_pair())
        .map(|(balls, strikes)| Count::Foul { balls, strikes });

    choice((ball, strike, foul))
}

fn mild_pitch<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, MildPitch, Extra<'a>> + Clone {
    let pathetic = just(Token::Newline)
        .ignore_then(phrase("Runners advance on the pathetic play"))
        .ignore_then(just(Token::Bang));
    let ball = kw("Ball")
        .ignore_then(just(Token::Comma))
        .ignore_then(count_pair())
        .then_ignore(just(Token::Period))
        .then(pathetic.or_not())
        .map(|((balls, strikes), advance)| MildPitchOutcome::Ball {
            balls,
            strikes,
            runners_advance: advance.is_some(),
        });
    let walked = name_before(phrase("draws a walk"))
        .then_ignore(phrase("draws a walk"))
        .then_ignore(just(Token::Period))
        .map(|batter| MildPitchOutcome::Walk { batter });

    name_before(phrase("throws a Mild pitch"))
        .then_ignore(phrase("throws a Mild pitch"))
        .then_ignore(just(Token::Bang))
        .then_ignore(just(Token::Newline))
        .then(choice((ball, walked)))
        .then(scores())
        .map(|((pitcher, outcome), scores)| MildPitch {
            pitcher,
            outcome,
            scores,
        })
}

fn blooddrain<'a, I: TokenInput<'a>>() -> impl Parser<'a, I, Blooddrain, Extra<'a>> + Clone {
    enum Tail {
        Effect(String, SiphonEffect, Option<String>),
        Increased(String),
    }

    let sealed = name_before(phrase("tried to siphon blood from"))
        .then_ignore(phrase("tried to siphon blood from"))
        .then(plain_name())
        .then_ignore(just(Token::Comma))
        .then_ignore(phrase("but they were Sealed"))
        .then_ignore(just(Token::Bang))
        .map(|(sipper, target)| Blooddrain::Sealed { sipper, target });

    let siphon_line = possessive_name()
        .then_ignore(phrase("Siphon activates"))
        .then_ignore(just(Token::Bang))
        .then_ignore(just(Token::Newline));

    let sip_line = name_before(phrase("siphoned some of"))
        .then_ignore(phrase("siphoned some of"))
        .then(possessive_name())
        .then(name_before(kw("ability")))
        .then_ignore(kw("ability"))
        .then_ignore(just(Token::Bang));

    let verb = choice((kw("adds").to(true), kw("removes").to(false)));
    let counter = select! {
        Token::Word(ref w) if w.as_str() == "Ball" => 0u8,
        Token::Word(ref w) if w.as_str() == "Strike" => 1u8,
        Token::Word(ref w) if w.as_str() == "Out" => 2u8,
    }
    .labelled("Ball, Strike or Out");
    let effect = just(Token::Newline)
        .ignore_then(name_before(choice((kw("adds"), kw("removes")))))
        .then(verb)
        .then_ignore(kw("a"))
        .then(counter)
        .then_ignore(just(Token::Bang))
        .then(clause("strikes out looking", Token::Period).or_not())
        .map(|(((actor, adds), counter), struck_out)| {
            let effect = match (adds, counter) {
                (true, 0) => SiphonEffect::AddBall,
                (false, 0) => SiphonEffect::RemoveBall,
                (true, 1) => SiphonEffect::AddStrike,
                (false, 1) => SiphonEffect::RemoveStrike,
                (true, _) => SiphonEffect::AddOut,
                (false, _) => SiphonEffect::RemoveOut,
            };
            Tail::Effect(actor, effect, struck_out)
        });
    let increased = just(Token::Newline)
        .ignore_then(name_before(phrase("increased their")))
        .then_ignore(phrase("increased their"))
        .then_ignore(name_before(kw("ability")))
        .then_ignore(kw("ability"))
        .then_ignore(just(Token::Bang))
        .map(Tail::Increased);

    let drained = siphon_line
        .or_not()
        .then(sip_line)
        .then(choice((effect, increased)))
        .try_map(|((siphoner, ((sipper, target), category)), tail), span| {
            let actor = match &tail {
                Tail::Effect(actor, ..) | Tail::Increased(actor) => actor,
            };
            if siphoner.as_ref().is_some_and(|s| *s != sipper) || *actor != sipper {
                return Err(Rich::custom(span, format!("sipper names disagree: expected {sipper} throughout")));
            }
            match tail {
                Tail::Effect(_, effect, struck_out) => {
                    if siphoner.is_none() {
                        return Err(Rich::custom(span, "siphon effect without an active Siphon"));
                    }
                    Ok(Blooddrain::Siphon {
                        sipper,
                        target,
                        category,
                        effect,
                        struck_out,
                    })
                }
                Tail::Increased(_) => Ok(Blooddrain::Drain {
                    sipper,
                    target,
                    category,
                    siphon: siphoner.is_some(),
                }),
            }
        });

    phrase("The Blooddrain gurgled")
        .ignore_then(just(Token::Bang))
        .ignore_then(just(Token::Newline))
        .ignore_then(choice((sealed, drained)))
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

fn tokenize(family: Family, text: &str) -> ParseResult<Vec<(Token, Span)>> {
    let (tokens, lex_errors) = lexer::lex(text);
    if let Some(first) = lex_errors.first() {
        return Err(ParseError {
            family,
            text: text.to_string(),
            span: first.span.clone(),
            message: lex_errors
                .iter()
                .map(|e| e.message.clone())
                .collect::<Vec<_>>()
                .join("; "),
        });
    }
    Ok(tokens.into_iter().map(|(tok, span)| (tok, Span::from(span))).collect())
}

fn to_parse_error(family: Family, text: &str, errors: Vec<Rich<'_, Token>>) -> ParseError {
    let span = errors
        .first()
        .map_or(text.len()..text.len(), |e| e.span().into_range());
    ParseError {
        family,
        text: text.to_string(),
        span,
        message: errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "),
    }
}

macro_rules! family_parser {
    ($(#[$doc:meta])* $name:ident, $family:ident, $out:ty, $grammar:ident) => {
        $(#[$doc])*
        pub fn $name(text: &str) -> ParseResult<$out> {
            let tokens = tokenize(Family::$family, text)?;
            let eoi: Span = (text.len()..text.len()).into();
            let stream = Stream::from_iter(tokens).map(eoi, |(t, s): (_, _)| (t, s));
            $grammar()
                .then_ignore(end())
                .parse(stream)
                .into_result()
                .map_err(|errors| to_parse_error(Family::$family, text, errors))
        }
    };
}

family_parser!(
    /// `Top of 1, Unlimited Tacos batting.`
    parse_half_inning, HalfInning, HalfInning, half_inning
);
family_parser!(
    /// `X batting for the Tacos.` with optional haunting and item clauses.
    parse_batter_up, BatterUp, BatterUp, batter_up
);
family_parser!(
    /// Stolen base or caught stealing.
    parse_steal, Steal, Steal, steal
);
family_parser!(
    /// Ground out, flyout, double play or fielder's choice.
    parse_fielding_out, FieldingOut, FieldingOut, fielding_out
);
family_parser!(
    /// Single, Double, Triple or Quadruple.
    parse_hit, Hit, Hit, hit
);
family_parser!(
    /// Solo, n-run and grand slam home runs.
    parse_home_run, HomeRun, HomeRun, home_run
);
family_parser!(
    /// `X draws a walk.`
    parse_walk, Walk, Walk, walk
);
family_parser!(
    /// Swinging, looking and charmed strikeouts.
    parse_strikeout, Strikeout, Strikeout, strikeout
);
family_parser!(
    /// Ball, strike and foul counts.
    parse_count, Count, Count, count
);
family_parser!(
    /// `P throws a Mild pitch!`
    parse_mild_pitch, MildPitch, MildPitch, mild_pitch
);
family_parser!(
    /// Siphon, drain and sealed blooddrains.
    parse_blooddrain, Blooddrain, Blooddrain, blooddrain
);

/// Parse `text` as a sentence of the given family.
pub fn parse(family: Family, text: &str) -> ParseResult<Sentence> {
    match family {
        Family::HalfInning => parse_half_inning(text).map(Sentence::HalfInning),
        Family::BatterUp => parse_batter_up(text).map(Sentence::BatterUp),
        Family::Steal => parse_steal(text).map(Sentence::Steal),
        Family::FieldingOut => parse_fielding_out(text).map(Sentence::FieldingOut),
        Family::Hit => parse_hit(text).map(Sentence::Hit),
        Family::HomeRun => parse_home_run(text).map(Sentence::HomeRun),
        Family::Walk => parse_walk(text).map(Sentence::Walk),
        Family::Strikeout => parse_strikeout(text).map(Sentence::Strikeout),
        Family::Count => parse_count(text).map(Sentence::Count),
        Family::MildPitch => parse_mild_pitch(text).map(Sentence::MildPitch),
        Family::Blooddrain => parse_blooddrain(text).map(Sentence::Blooddrain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_half_inning_multiword_team() {
        let s = parse_half_inning("Top of 3, Kansas City Breath Mints batting.").unwrap();
        assert!(s.top);
        assert_eq!(s.inning, 3);
        assert_eq!(s.team, "Kansas City Breath Mints");
    }

    #[test]
    fn parse_half_inning_rejects_bad_half() {
        let err = parse_half_inning("Middle of 3, Crabs batting.").unwrap_err();
        assert_eq!(err.family, Family::HalfInning);
        assert_eq!(err.span, 0..6);
    }

    #[test]
    fn parse_batter_up_plain() {
        let s = parse_batter_up("Jessica Telephone batting for the Lovers.").unwrap();
        assert_eq!(s.batter, "Jessica Telephone");
        assert_eq!(s.team, "Lovers");
        assert!(s.inhabiting.is_none());
        assert!(s.wielding.is_none());
    }

    #[test]
    fn parse_batter_up_inhabiting_and_wielding() {
        let text = "Ghost Guy is Inhabiting Lineup Guy!\nGhost Guy batting for the Breath Mints, wielding a Mushroom Glove.";
        let s = parse_batter_up(text).unwrap();
        let inhabiting = s.inhabiting.clone().unwrap();
        assert_eq!(inhabiting.haunter, "Ghost Guy");
        assert_eq!(inhabiting.haunted, "Lineup Guy");
        assert_eq!(s.team, "Breath Mints");
        assert_eq!(s.wielding.as_deref(), Some("a Mushroom Glove"));
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_steal_with_blaserunning_and_refill() {
        let text = "Ed Helmuth steals fourth base!\nEd Helmuth scores with Blaserunning!\nEd Helmuth used their Free Refill.\nEd Helmuth Refills the In!";
        let s = parse_steal(text).unwrap();
        match &s {
            Steal::Stolen {
                runner,
                base,
                blaserunning,
                refills,
            } => {
                assert_eq!(runner, "Ed Helmuth");
                assert_eq!(*base, Base::Fourth);
                assert_eq!(blaserunning.as_deref(), Some("Ed Helmuth"));
                assert_eq!(refills, &vec!["Ed Helmuth".to_string()]);
            }
            other => panic!("expected stolen base, got {other:?}"),
        }
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_caught_stealing() {
        let s = parse_steal("Mooney Doctor gets caught stealing third base.").unwrap();
        assert_eq!(
            s,
            Steal::Caught {
                runner: "Mooney Doctor".into(),
                base: Base::Third
            }
        );
    }

    #[test]
    fn parse_refill_names_must_match() {
        let text = "A B steals second base!\nA B used their Free Refill.\nC D Refills the In!";
        assert!(parse_steal(text).is_err());
    }

    #[test]
    fn parse_ground_out_with_sacrifices() {
        let text = "Hewitt Best hit a ground out to Nagomi Mcdaniel.\nEd Helmuth advances on the sacrifice.";
        let s = parse_fielding_out(text).unwrap();
        assert_eq!(s.batter(), "Hewitt Best");
        assert_eq!(s.scorers(), ["Ed Helmuth".to_string()]);
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_flyout_tag_ups() {
        let text = "Hewitt Best hit a flyout to Nagomi Mcdaniel.\nEd Helmuth tags up and scores!\nJessica Telephone tags up and scores!";
        let s = parse_fielding_out(text).unwrap();
        assert!(matches!(s, FieldingOut::Flyout { .. }));
        assert_eq!(s.scorers().len(), 2);
    }

    #[test]
    fn parse_double_play() {
        let s = parse_fielding_out("Hewitt Best hit into a double play!\nEd Helmuth scores!").unwrap();
        assert!(matches!(s, FieldingOut::DoublePlay { .. }));
        assert_eq!(s.scorers(), ["Ed Helmuth".to_string()]);
    }

    #[test]
    fn parse_fielders_choice() {
        let text = "Jessica Telephone out at second base.\nEd Helmuth scores!\nHewitt Best reaches on fielder's choice.";
        match parse_fielding_out(text).unwrap() {
            FieldingOut::FieldersChoice {
                runner_out,
                base,
                scores,
                batter,
                ..
            } => {
                assert_eq!(runner_out, "Jessica Telephone");
                assert_eq!(base, Base::Second);
                assert_eq!(scores, vec!["Ed Helmuth".to_string()]);
                assert_eq!(batter, "Hewitt Best");
            }
            other => panic!("expected fielder's choice, got {other:?}"),
        }
    }

    #[test]
    fn parse_hit_heating_up_after_scores() {
        let text = "Hewitt Best hits a Double!\nEd Helmuth scores!\nHewitt Best is Heating Up!";
        let s = parse_hit(text).unwrap();
        assert_eq!(s.kind, HitKind::Double);
        assert_eq!(s.heating_up.as_deref(), Some("Hewitt Best"));
        assert_eq!(s.scores, vec!["Ed Helmuth".to_string()]);
    }

    #[test]
    fn parse_home_run_counts() {
        assert_eq!(parse_home_run("A B hits a solo home run!").unwrap().runs, 1);
        assert_eq!(parse_home_run("A B hits a 3-run home run!").unwrap().runs, 3);
        assert_eq!(parse_home_run("A B hits a grand slam!").unwrap().runs, 4);
    }

    #[test]
    fn parse_walk_forcing_a_run() {
        let s = parse_walk("A B draws a walk.\nC D scores!").unwrap();
        assert_eq!(s.batter, "A B");
        assert_eq!(s.scores, vec!["C D".to_string()]);
    }

    #[test]
    fn parse_strikeouts() {
        assert_eq!(
            parse_strikeout("A B strikes out looking.").unwrap(),
            Strikeout::Looking { batter: "A B".into() }
        );
        let text = "Pitcher Person charmed A B!\nA B swings 3 times to strike out willingly!";
        let s = parse_strikeout(text).unwrap();
        assert_eq!(
            s,
            Strikeout::Charmed {
                pitcher: "Pitcher Person".into(),
                batter: "A B".into(),
                swings: 3
            }
        );
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_counts() {
        assert_eq!(parse_count("Ball. 1-0").unwrap(), Count::Ball { balls: 1, strikes: 0 });
        assert_eq!(
            parse_count("Strike, swinging. 0-1").unwrap(),
            Count::Strike {
                call: StrikeCall::Swinging,
                balls: 0,
                strikes: 1
            }
        );
        assert_eq!(parse_count("Foul Ball. 2-2").unwrap().count(), (2, 2));
        assert!(parse_count("Strike, dancing. 0-1").is_err());
    }

    #[test]
    fn parse_mild_pitch_ball_with_advance() {
        let text = "Pitcher Person throws a Mild pitch!\nBall, 2-1.\nRunners advance on the pathetic play!\nA B scores!";
        let s = parse_mild_pitch(text).unwrap();
        assert_eq!(
            s.outcome,
            MildPitchOutcome::Ball {
                balls: 2,
                strikes: 1,
                runners_advance: true
            }
        );
        assert_eq!(s.scores, vec!["A B".to_string()]);
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_mild_pitch_walk() {
        let s = parse_mild_pitch("P Q throws a Mild pitch!\nA B draws a walk.").unwrap();
        assert_eq!(s.outcome, MildPitchOutcome::Walk { batter: "A B".into() });
    }

    #[test]
    fn parse_blooddrain_siphon() {
        let text = "The Blooddrain gurgled!\nSixpack Dogwalker's Siphon activates!\nSixpack Dogwalker siphoned some of Jaylen Hotdogfingers's pitching ability!\nSixpack Dogwalker removes a Ball!";
        match parse_blooddrain(text).unwrap() {
            Blooddrain::Siphon {
                sipper,
                target,
                category,
                effect,
                struck_out,
            } => {
                assert_eq!(sipper, "Sixpack Dogwalker");
                assert_eq!(target, "Jaylen Hotdogfingers");
                assert_eq!(category, "pitching");
                assert_eq!(effect, SiphonEffect::RemoveBall);
                assert!(struck_out.is_none());
            }
            other => panic!("expected siphon, got {other:?}"),
        }
    }

    #[test]
    fn parse_blooddrain_plain_drain() {
        let text = "The Blooddrain gurgled!\nA B siphoned some of C D's baserunning ability!\nA B increased their baserunning ability!";
        let s = parse_blooddrain(text).unwrap();
        assert_eq!(
            s,
            Blooddrain::Drain {
                sipper: "A B".into(),
                target: "C D".into(),
                category: "baserunning".into(),
                siphon: false
            }
        );
        assert_eq!(s.to_string(), text);
    }

    #[test]
    fn parse_blooddrain_sealed() {
        let s = parse_blooddrain("The Blooddrain gurgled!\nA B tried to siphon blood from C D, but they were Sealed!").unwrap();
        assert_eq!(
            s,
            Blooddrain::Sealed {
                sipper: "A B".into(),
                target: "C D".into()
            }
        );
    }

    #[test]
    fn blooddrain_sipper_must_be_one_player() {
        let mixed = "The Blooddrain gurgled!\nAlpha One's Siphon activates!\nBeta Two siphoned some of Gamma Three's pitching ability!\nDelta Four adds a Strike!";
        assert!(parse(Family::Blooddrain, mixed).is_err());

        let wrong_actor = "The Blooddrain gurgled!\nBeta Two's Siphon activates!\nBeta Two siphoned some of Gamma Three's pitching ability!\nDelta Four adds a Strike!";
        assert!(parse_blooddrain(wrong_actor).is_err());

        let wrong_siphon = "The Blooddrain gurgled!\nAlpha One's Siphon activates!\nBeta Two siphoned some of Gamma Three's pitching ability!\nBeta Two adds a Strike!";
        assert!(parse_blooddrain(wrong_siphon).is_err());

        let wrong_drain = "The Blooddrain gurgled!\nA B siphoned some of C D's baserunning ability!\nE F increased their baserunning ability!";
        assert!(parse_blooddrain(wrong_drain).is_err());

        let agreed = "The Blooddrain gurgled!\nBeta Two's Siphon activates!\nBeta Two siphoned some of Gamma Three's pitching ability!\nBeta Two adds a Strike!";
        assert!(matches!(
            parse_blooddrain(agreed).unwrap(),
            Blooddrain::Siphon { ref sipper, effect: SiphonEffect::AddStrike, .. } if sipper == "Beta Two"
        ));
    }

    #[test]
    fn parse_dispatches_by_family() {
        let s = parse(Family::Walk, "A B draws a walk.").unwrap();
        assert!(matches!(s, Sentence::Walk(_)));
        assert!(parse(Family::Hit, "A B draws a walk.").is_err());
    }

    #[test]
    fn family_names_round_trip() {
        for family in Family::ALL {
            assert_eq!(family.name().parse::<Family>().unwrap(), family);
        }
        assert!("bunt".parse::<Family>().is_err());
    }
}
