//! Per-side play recording.
//!
//! A `Recorder` follows one team through a reconstructed game. It tracks who
//! is batting, turns each narrated pitch into a [`Pitch`], measures how far
//! runners went beyond what a play forced, and notes every runner's steal
//! decision so replays can stay aligned with the original.

use std::collections::BTreeMap;

use chrono::Duration;
use rand::Rng;
use rand::rngs::StdRng;
use rb_core::{ActionKind, NarrationEvent, PlayerId, Roster, Snapshot, TeamState};
use rb_parse::ast::{Count, FieldingOut, Steal, StrikeCall, Strikeout};
use rb_parse::parser::{parse_batter_up, parse_count, parse_fielding_out, parse_hit, parse_steal, parse_strikeout};

use crate::error::{ModelError, ModelResult};
use crate::pitch::{Pitch, PitchOutcome, StealDecision, StealRecord};

/// Action codes that carry nothing a replay needs.
///
/// Steals (4) are here because they are recorded as decisions, not pitches.
pub const IGNORED_CODES: &[i64] = &[
    0, 1, 2, 3, 4, 11, 20, 21, 24, 25, 26, 28, 30, 31, 33, 34, 35, 36, 37, 39, 40, 45, 47, 48, 51, 52, 53, 55, 62, 63,
    64, 65, 66, 67, 69, 70, 71, 72, 73, 74, 76, 77, 78, 79, 84, 85, 86, 88, 91, 92, 93, 96, 97, 99,
];

/// Everything one side did at the plate and on the bases in one game.
#[derive(Debug, Clone)]
pub struct Recorder {
    team: TeamState,
    pitches: Vec<Pitch>,
    advancements: BTreeMap<PlayerId, Vec<i64>>,
    steals: BTreeMap<PlayerId, Vec<StealRecord>>,
}

impl Recorder {
    /// Start recording for a team, before its first batter.
    pub fn new(team: TeamState) -> Self {
        Self {
            team,
            pitches: Vec::new(),
            advancements: BTreeMap::new(),
            steals: BTreeMap::new(),
        }
    }

    /// The team as the recorder currently sees it.
    pub fn team(&self) -> &TeamState {
        &self.team
    }

    /// Every recorded pitch, in order.
    pub fn pitches(&self) -> &[Pitch] {
        &self.pitches
    }

    /// Record one event of this side's half-innings.
    ///
    /// `pre` is the reconstructed snapshot before the event; `before` and
    /// `after` are the observed snapshots around it, when the feed has them.
    pub fn record(
        &mut self,
        event: &NarrationEvent,
        pre: &Snapshot,
        before: Option<&Snapshot>,
        after: Option<&Snapshot>,
    ) -> ModelResult<()> {
        match event.action() {
            ActionKind::BatterUp => return self.batter_up(event),
            ActionKind::ShelledBatter => {
                self.team.advance_batter();
                return Ok(());
            }
            ActionKind::StolenBase => return self.steal(event, pre),
            // Substitutions go through `replace_player`.
            ActionKind::Incineration | ActionKind::FeedbackSwap => return Ok(()),
            _ => {}
        }

        let Some(outcome) = pitch_outcome(event, after)? else {
            return Ok(());
        };
        let batter = self
            .team
            .batter()
            .ok_or_else(|| ModelError::UnknownBatter("a pitch came before any batter".into()))?
            .id;
        let advancements = self.advancements(event, outcome, before, after);
        self.note_steal_chances(pre, None);
        self.pitches.push(Pitch {
            batter,
            appearance: self.team.appearance_count(),
            outcome,
            text: event.description.clone(),
            advancements,
        });
        Ok(())
    }

    /// Apply an incineration or feedback swap to this side, if it involves it.
    ///
    /// The first two player tags are tried in both orders; the first tagged
    /// player found on this team is replaced by the other.
    pub fn replace_player<R: Roster>(&mut self, event: &NarrationEvent, roster: &R) -> ModelResult<()> {
        let [a, b] = match event.player_tags.as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Ok(()),
        };
        let at = event.created + Duration::seconds(180);
        for (departing, arriving) in [(a, b), (b, a)] {
            let here = self.team.pitcher.id == departing || self.team.lineup().iter().any(|p| p.id == departing);
            if here {
                let replacement = roster.player_at(arriving, at)?;
                self.team.replace_player(departing, &replacement);
                return Ok(());
            }
        }
        Ok(())
    }

    /// Pitches `batter` saw on a given pass through the order.
    pub fn pitches_for(&self, batter: PlayerId, appearance: u32) -> Vec<&Pitch> {
        self.pitches
            .iter()
            .filter(|p| p.batter == batter && p.appearance == appearance)
            .collect()
    }

    /// The pitch a replay should use next for `batter`.
    ///
    /// Walks the pitches from the same pass through the order by `cursor`;
    /// once those run out, picks uniformly from everything the batter saw.
    pub fn sample_pitch(
        &self,
        batter: PlayerId,
        appearance: u32,
        cursor: usize,
        rng: &mut StdRng,
    ) -> ModelResult<&Pitch> {
        if let Some(pitch) = self
            .pitches
            .iter()
            .filter(|p| p.batter == batter && p.appearance == appearance)
            .nth(cursor)
        {
            return Ok(pitch);
        }
        let history: Vec<&Pitch> = self.pitches.iter().filter(|p| p.batter == batter).collect();
        if history.is_empty() {
            return Err(ModelError::ExhaustedModel {
                player: batter,
                decision: "pitch",
            });
        }
        Ok(history[rng.random_range(0..history.len())])
    }

    /// The `cursor`-th steal decision `runner` made on a given pass through
    /// the order. Runners with nothing recorded stay put.
    pub fn next_steal(&self, runner: PlayerId, appearance: u32, cursor: usize) -> StealDecision {
        self.steals
            .get(&runner)
            .and_then(|records| records.iter().filter(|r| r.appearance == appearance).nth(cursor))
            .map_or(StealDecision::Stay, |r| r.decision)
    }

    /// Extra bases `runner` took on some recorded play, 0 without history.
    pub fn random_advancement(&self, runner: PlayerId, rng: &mut StdRng) -> i64 {
        match self.advancements.get(&runner) {
            Some(history) if !history.is_empty() => history[rng.random_range(0..history.len())],
            _ => 0,
        }
    }

    fn batter_up(&mut self, event: &NarrationEvent) -> ModelResult<()> {
        let parsed = parse_batter_up(&event.description)?;
        let named = parsed
            .inhabiting
            .as_ref()
            .map_or(parsed.batter.as_str(), |i| i.haunted.as_str());

        if self.team.next_batter().name == named {
            self.team.advance_batter();
            return Ok(());
        }
        // The same batter coming back up.
        if self.team.batter().is_some_and(|b| b.name == named) {
            return Ok(());
        }
        Err(ModelError::UnknownBatter(named.to_string()))
    }

    fn steal(&mut self, event: &NarrationEvent, pre: &Snapshot) -> ModelResult<()> {
        let (runner, decision) = match parse_steal(&event.description)? {
            Steal::Stolen { runner, .. } => (runner, StealDecision::Attempt),
            Steal::Caught { runner, .. } => (runner, StealDecision::Caught),
        };
        self.note_steal_chances(pre, Some((runner.as_str(), decision)));
        Ok(())
    }

    /// One decision per runner on base before the play.
    fn note_steal_chances(&mut self, pre: &Snapshot, stealer: Option<(&str, StealDecision)>) {
        let appearance = self.team.appearance_count();
        for (id, name) in pre.base_runners.iter().zip(&pre.base_runner_names) {
            let decision = match stealer {
                Some((stealer, decision)) if stealer == name => decision,
                _ => StealDecision::Stay,
            };
            self.steals
                .entry(*id)
                .or_default()
                .push(StealRecord { appearance, decision });
        }
    }

    /// Bases each runner took beyond what the play guaranteed them.
    ///
    /// Needs both observed snapshots. Runners new to the bases get 0. A runner
    /// whose next base was occupied had no real choice and is skipped.
    fn advancements(
        &mut self,
        event: &NarrationEvent,
        outcome: PitchOutcome,
        before: Option<&Snapshot>,
        after: Option<&Snapshot>,
    ) -> BTreeMap<PlayerId, i64> {
        let (Some(before), Some(after)) = (before, after) else {
            return BTreeMap::new();
        };
        let forced = match outcome {
            PitchOutcome::Hit(base) => base + 1,
            _ => 0,
        };
        let prior: BTreeMap<PlayerId, i64> = before
            .base_runners
            .iter()
            .copied()
            .zip(before.bases_occupied.iter().copied())
            .collect();

        let mut taken = BTreeMap::new();
        for (runner, base_after) in after.base_runners.iter().zip(&after.bases_occupied) {
            match prior.get(runner) {
                None => {
                    taken.insert(*runner, 0);
                }
                Some(base_before) => {
                    let minimum = base_before + forced;
                    if !before.bases_occupied.contains(&(minimum + 1)) {
                        taken.insert(*runner, (base_after - minimum).max(0));
                    }
                }
            }
        }

        let home = before.base_count(before.batting_side()) - 1;
        let runners = before.base_runners.iter().zip(&before.base_runner_names);
        for ((runner, name), base_before) in runners.zip(&before.bases_occupied) {
            let scored = [
                format!("{name} scores"),
                format!("{name} tags up and scores"),
                format!("{name} advances on the sacrifice"),
            ]
            .iter()
            .any(|phrase| event.description.contains(phrase.as_str()));
            if scored {
                taken.insert(*runner, (home - (base_before + forced)).max(0));
            }
        }

        for (runner, extra) in &taken {
            self.advancements.entry(*runner).or_default().push(*extra);
        }
        taken
    }
}

/// Classify an event as a pitch, or `None` when it is not one.
fn pitch_outcome(event: &NarrationEvent, after: Option<&Snapshot>) -> ModelResult<Option<PitchOutcome>> {
    let text = &event.description;
    let outcome = match event.action() {
        ActionKind::Walk | ActionKind::Ball | ActionKind::MildPitch => PitchOutcome::Ball,
        ActionKind::FoulBall => PitchOutcome::Foul,
        ActionKind::HomeRun => PitchOutcome::HomeRun,
        ActionKind::Strike => match parse_count(text)? {
            Count::Strike {
                call: StrikeCall::Swinging,
                ..
            } => PitchOutcome::StrikeSwinging,
            _ => PitchOutcome::StrikeLooking,
        },
        ActionKind::Strikeout => match parse_strikeout(text)? {
            Strikeout::Swinging { .. } => PitchOutcome::StrikeSwinging,
            Strikeout::Looking { .. } => PitchOutcome::StrikeLooking,
            Strikeout::Charmed { .. } => return Ok(None),
        },
        ActionKind::FlyOut => PitchOutcome::Flyout,
        ActionKind::GroundOut => match parse_fielding_out(text)? {
            FieldingOut::GroundOut { .. } | FieldingOut::Flyout { .. } => PitchOutcome::GroundOut,
            FieldingOut::DoublePlay { .. } => PitchOutcome::DoublePlay,
            // The batter is the last runner listed.
            FieldingOut::FieldersChoice { .. } => {
                PitchOutcome::FieldersChoice(after.and_then(|s| s.bases_occupied.last().copied()).unwrap_or(0))
            }
        },
        ActionKind::Hit => PitchOutcome::Hit(parse_hit(text)?.kind.base_index()),
        action if IGNORED_CODES.contains(&action.code()) => return Ok(None),
        action => return Err(ModelError::UnknownAction(action.code())),
    };
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rb_core::{PlayerState, StaticRoster, TeamId};

    use super::*;

    fn team() -> TeamState {
        let lineup = ["Alpha Taco", "Beta Taco", "Gamma Taco"]
            .into_iter()
            .map(|name| PlayerState::new(PlayerId::new(), name))
            .collect();
        TeamState::new(
            TeamId::new(),
            "Tacos",
            PlayerState::new(PlayerId::new(), "Taco Pitcher"),
            lineup,
        )
        .unwrap()
    }

    fn event(action: ActionKind, text: &str) -> NarrationEvent {
        NarrationEvent::new(action, text, 0, Utc.with_ymd_and_hms(2021, 3, 1, 16, 0, 0).unwrap())
    }

    fn bases(runners: &[(PlayerId, &str, i64)]) -> Snapshot {
        Snapshot {
            top_of_inning: true,
            away_bases: 4,
            home_bases: 4,
            base_runners: runners.iter().map(|r| r.0).collect(),
            base_runner_names: runners.iter().map(|r| r.1.to_string()).collect(),
            base_runner_mods: runners.iter().map(|_| String::new()).collect(),
            bases_occupied: runners.iter().map(|r| r.2).collect(),
            baserunner_count: runners.len() as i64,
            ..Snapshot::default()
        }
    }

    fn up(recorder: &mut Recorder, name: &str) {
        let text = format!("{name} batting for the Tacos.");
        recorder
            .record(&event(ActionKind::BatterUp, &text), &Snapshot::default(), None, None)
            .unwrap();
    }

    fn pitch(recorder: &mut Recorder, action: ActionKind, text: &str) {
        recorder
            .record(&event(action, text), &Snapshot::default(), None, None)
            .unwrap();
    }

    #[test]
    fn batter_up_advances_or_repeats() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        assert_eq!(r.team().batter().unwrap().name, "Alpha Taco");
        up(&mut r, "Alpha Taco");
        assert_eq!(r.team().batter_index(), Some(0));
        up(&mut r, "Beta Taco");
        assert_eq!(r.team().batter().unwrap().name, "Beta Taco");
    }

    #[test]
    fn inhabited_batter_counts_as_the_lineup_batter() {
        let mut r = Recorder::new(team());
        let text = "Ghost Taco is Inhabiting Alpha Taco!\nGhost Taco batting for the Tacos.";
        r.record(&event(ActionKind::BatterUp, text), &Snapshot::default(), None, None)
            .unwrap();
        assert_eq!(r.team().batter().unwrap().name, "Alpha Taco");
    }

    #[test]
    fn unexpected_batter_is_an_error() {
        let mut r = Recorder::new(team());
        let err = r
            .record(
                &event(ActionKind::BatterUp, "Gamma Taco batting for the Tacos."),
                &Snapshot::default(),
                None,
                None,
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownBatter(name) if name == "Gamma Taco"));
    }

    #[test]
    fn pitches_are_classified() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        pitch(&mut r, ActionKind::Strike, "Strike, swinging. 0-1");
        pitch(&mut r, ActionKind::Strike, "Strike, flinching. 0-2");
        pitch(&mut r, ActionKind::FoulBall, "Foul Ball. 0-2");
        pitch(&mut r, ActionKind::Hit, "Alpha Taco hits a Triple!");
        let outcomes: Vec<_> = r.pitches().iter().map(|p| p.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                PitchOutcome::StrikeSwinging,
                PitchOutcome::StrikeLooking,
                PitchOutcome::Foul,
                PitchOutcome::Hit(2),
            ]
        );
        assert!(r.pitches().iter().all(|p| p.appearance == 0));
        assert_eq!(r.pitches()[3].text, "Alpha Taco hits a Triple!");
    }

    #[test]
    fn charm_strikeouts_and_flavor_are_not_pitches() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        pitch(
            &mut r,
            ActionKind::Strikeout,
            "Crab Pitcher charmed Alpha Taco!\nAlpha Taco swings 3 times to strike out willingly!",
        );
        pitch(&mut r, ActionKind::PeanutFlavor, "A peanut thing happens.");
        pitch(&mut r, ActionKind::Other(62), "The water sweeps the bases.");
        assert!(r.pitches().is_empty());
    }

    #[test]
    fn unknown_code_is_an_error() {
        let mut r = Recorder::new(team());
        let err = r
            .record(&event(ActionKind::Other(1000), "?"), &Snapshot::default(), None, None)
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownAction(1000)));
    }

    #[test]
    fn fielders_choice_records_the_batters_base() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        up(&mut r, "Beta Taco");
        let alpha = r.team().lineup()[0].id;
        let beta = r.team().lineup()[1].id;
        let after = bases(&[(beta, "Beta Taco", 0)]);
        r.record(
            &event(
                ActionKind::GroundOut,
                "Alpha Taco out at second base.\nBeta Taco reaches on fielder's choice.",
            ),
            &bases(&[(alpha, "Alpha Taco", 0)]),
            None,
            Some(&after),
        )
        .unwrap();
        assert_eq!(r.pitches()[0].outcome, PitchOutcome::FieldersChoice(0));
    }

    #[test]
    fn extra_bases_on_a_single() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        up(&mut r, "Beta Taco");
        let alpha = r.team().lineup()[0].id;
        let beta = r.team().lineup()[1].id;
        let before = bases(&[(alpha, "Alpha Taco", 0)]);
        let after = bases(&[(alpha, "Alpha Taco", 2), (beta, "Beta Taco", 0)]);
        r.record(
            &event(ActionKind::Hit, "Beta Taco hits a Single!"),
            &before,
            Some(&before),
            Some(&after),
        )
        .unwrap();

        let taken = &r.pitches()[0].advancements;
        assert_eq!(taken.get(&alpha), Some(&1));
        assert_eq!(taken.get(&beta), Some(&0));
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(r.random_advancement(alpha, &mut rng), 1);
    }

    #[test]
    fn scorer_is_credited_past_the_forced_base() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        up(&mut r, "Beta Taco");
        let alpha = r.team().lineup()[0].id;
        let beta = r.team().lineup()[1].id;
        let before = bases(&[(alpha, "Alpha Taco", 0)]);
        let after = bases(&[(beta, "Beta Taco", 1)]);
        r.record(
            &event(ActionKind::Hit, "Beta Taco hits a Double!\nAlpha Taco scores!"),
            &before,
            Some(&before),
            Some(&after),
        )
        .unwrap();
        assert_eq!(r.pitches()[0].advancements.get(&alpha), Some(&1));
    }

    #[test]
    fn no_observed_snapshots_no_advancement() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        pitch(&mut r, ActionKind::Hit, "Alpha Taco hits a Single!");
        assert!(r.pitches()[0].advancements.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(r.random_advancement(r.team().lineup()[0].id, &mut rng), 0);
    }

    #[test]
    fn steal_decisions_line_up_with_chances() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        up(&mut r, "Beta Taco");
        let alpha = r.team().lineup()[0].id;
        let on_first = bases(&[(alpha, "Alpha Taco", 0)]);
        let on_second = bases(&[(alpha, "Alpha Taco", 1)]);

        r.record(&event(ActionKind::Ball, "Ball. 1-0"), &on_first, None, None)
            .unwrap();
        r.record(
            &event(ActionKind::StolenBase, "Alpha Taco steals second base!"),
            &on_first,
            None,
            None,
        )
        .unwrap();
        r.record(&event(ActionKind::Ball, "Ball. 2-0"), &on_second, None, None)
            .unwrap();

        assert_eq!(r.next_steal(alpha, 0, 0), StealDecision::Stay);
        assert_eq!(r.next_steal(alpha, 0, 1), StealDecision::Attempt);
        assert_eq!(r.next_steal(alpha, 0, 2), StealDecision::Stay);
        // Past the record: stay.
        assert_eq!(r.next_steal(alpha, 0, 9), StealDecision::Stay);
        assert_eq!(r.next_steal(alpha, 1, 0), StealDecision::Stay);
        // Steals are decisions, not pitches.
        assert_eq!(r.pitches().len(), 2);
    }

    #[test]
    fn sampling_walks_the_appearance_then_falls_back() {
        let mut r = Recorder::new(team());
        up(&mut r, "Alpha Taco");
        pitch(&mut r, ActionKind::Ball, "Ball. 1-0");
        pitch(&mut r, ActionKind::Strike, "Strike, looking. 1-1");
        let alpha = r.team().lineup()[0].id;
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(r.sample_pitch(alpha, 0, 0, &mut rng).unwrap().outcome, PitchOutcome::Ball);
        assert_eq!(
            r.sample_pitch(alpha, 0, 1, &mut rng).unwrap().outcome,
            PitchOutcome::StrikeLooking
        );
        let fallback = r.sample_pitch(alpha, 4, 0, &mut rng).unwrap();
        assert_eq!(fallback.batter, alpha);
    }

    #[test]
    fn sampling_without_history_is_exhausted() {
        let r = Recorder::new(team());
        let gamma = r.team().lineup()[2].id;
        let mut rng = StdRng::seed_from_u64(3);
        let err = r.sample_pitch(gamma, 0, 0, &mut rng).unwrap_err();
        assert!(matches!(err, ModelError::ExhaustedModel { player, .. } if player == gamma));
    }

    #[test]
    fn incineration_replaces_the_tagged_player() {
        let mut r = Recorder::new(team());
        let beta = r.team().lineup()[1].id;
        let ashes = PlayerState::new(PlayerId::new(), "Ashes Taco");
        let roster = StaticRoster::new().with_player(ashes.clone());
        let burn = event(ActionKind::Incineration, "Rogue Umpire incinerated Beta Taco!").with_tags(vec![beta, ashes.id]);
        r.replace_player(&burn, &roster).unwrap();
        assert_eq!(r.team().lineup()[1].name, "Ashes Taco");

        // A swap naming nobody on this team leaves it alone.
        let elsewhere = event(ActionKind::FeedbackSwap, "Reality flickers.").with_tags(vec![PlayerId::new(), PlayerId::new()]);
        r.replace_player(&elsewhere, &roster).unwrap();
        assert_eq!(r.team().lineup()[1].name, "Ashes Taco");
    }
}
