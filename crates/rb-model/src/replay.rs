//! Seeded replay of recorded games.
//!
//! The generator writes narration for a fresh game and feeds it through a
//! [`Reconstructor`], so every synthetic snapshot obeys the same rules as a
//! reconstructed one. Pitches, extra bases, and steal attempts come from the
//! two [`Recorder`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rb_core::player::BLASERUNNING;
use rb_core::{ActionKind, GameSetup, NarrationEvent, PlayerId, PlayerState, Roster, Side, Snapshot, bases};
use rb_engine::{MachineState, Reconstructor, RunnerTruth, format_runs};
use rb_parse::ast::{Base, BatterUp, Count, FieldingOut, HalfInning, Hit, HitKind, HomeRun, Steal, StrikeCall, Strikeout, Walk};
use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::pitch::{PitchOutcome, StealDecision};
use crate::recorder::Recorder;

/// A synthesized event plus where the runners should stand after it.
struct Play {
    action: ActionKind,
    text: String,
    truth: Option<RunnerTruth>,
}

impl Play {
    fn new(action: ActionKind, text: impl ToString) -> Self {
        Self {
            action,
            text: text.to_string(),
            truth: None,
        }
    }

    fn with_truth(mut self, truth: RunnerTruth) -> Self {
        self.truth = Some(truth);
        self
    }
}

/// A runner as the replay sees them before a play.
struct OnBase {
    id: PlayerId,
    name: String,
    base: i64,
}

/// Generates one synthetic game, a snapshot per event.
///
/// Iteration ends when the game is over, when the play ceiling is reached, or
/// right after the first error.
pub struct ReplayGenerator<R> {
    machine: Reconstructor<R>,
    away: Recorder,
    home: Recorder,
    rng: StdRng,
    config: ModelConfig,
    pitch_cursors: BTreeMap<(PlayerId, u32), usize>,
    steal_cursors: BTreeMap<(PlayerId, u32), usize>,
    created: DateTime<Utc>,
    play: i64,
    finished: bool,
}

impl<R: Roster> ReplayGenerator<R> {
    /// Set up a replay of `setup` with teams loaded as of `at`.
    ///
    /// Verification is switched off: there are no observed snapshots.
    pub fn new(
        setup: &GameSetup,
        roster: R,
        at: DateTime<Utc>,
        away: Recorder,
        home: Recorder,
        config: ModelConfig,
    ) -> ModelResult<Self> {
        let engine = config.engine.clone().with_verify(false);
        Ok(Self {
            machine: Reconstructor::new(setup, roster, at, engine)?,
            away,
            home,
            rng: StdRng::seed_from_u64(config.seed),
            config,
            pitch_cursors: BTreeMap::new(),
            steal_cursors: BTreeMap::new(),
            created: at,
            play: 0,
            finished: false,
        })
    }

    /// The reconstructor's current state.
    pub fn state(&self) -> MachineState {
        self.machine.state()
    }

    fn model(&mut self, side: Side) -> (&Recorder, &mut StdRng) {
        let recorder = match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        };
        (recorder, &mut self.rng)
    }

    fn next_play(&mut self) -> ModelResult<Option<Play>> {
        let play = match self.machine.state() {
            MachineState::AwaitStart => Play::new(ActionKind::LetsGo, "Let's Go!"),
            MachineState::AwaitPlayBall => Play::new(ActionKind::PlayBall, "Play ball!"),
            MachineState::AwaitHalfInningStart => self.half_inning(),
            MachineState::AwaitBatterUp => self.batter_up(),
            MachineState::AwaitPitch => self.pitch()?,
            MachineState::AwaitInningEnd => {
                let inning = self.machine.snapshot().inning + 1;
                Play::new(ActionKind::InningEnd, format!("Inning {inning} is now an Outing."))
            }
            MachineState::AwaitGameEnd => Play::new(ActionKind::GameEnd, self.final_score()),
            MachineState::Done => return Ok(None),
        };
        Ok(Some(play))
    }

    fn half_inning(&self) -> Play {
        let s = self.machine.snapshot();
        let top = !s.top_of_inning;
        let side = if top { Side::Away } else { Side::Home };
        let sentence = HalfInning {
            top,
            inning: if s.top_of_inning { s.inning + 1 } else { s.inning + 2 },
            team: s.team_name(side).to_string(),
        };
        Play::new(ActionKind::HalfInningStart, sentence)
    }

    fn batter_up(&self) -> Play {
        let team = self.machine.team(self.machine.batting_side());
        let batter = team.next_batter();
        let sentence = BatterUp {
            inhabiting: None,
            batter: batter.name.clone(),
            team: team.nickname.clone(),
            wielding: batter.legacy_item.clone(),
        };
        Play::new(ActionKind::BatterUp, sentence)
    }

    fn final_score(&self) -> String {
        let s = self.machine.snapshot();
        let away = format!("{} {}", self.machine.team(Side::Away).nickname, format_runs(s.away_score));
        let home = format!("{} {}", self.machine.team(Side::Home).nickname, format_runs(s.home_score));
        if s.home_score > s.away_score {
            format!("{home}, {away}")
        } else {
            format!("{away}, {home}")
        }
    }

    fn runners(&self) -> Vec<OnBase> {
        let s = self.machine.snapshot();
        s.base_runners
            .iter()
            .zip(&s.base_runner_names)
            .zip(&s.bases_occupied)
            .map(|((id, name), base)| OnBase {
                id: *id,
                name: name.clone(),
                base: *base,
            })
            .collect()
    }

    fn pitch(&mut self) -> ModelResult<Play> {
        if let Some(steal) = self.steal_attempt() {
            return Ok(steal);
        }

        let side = self.machine.batting_side();
        let team = self.machine.team(side);
        let batter = team
            .batter()
            .cloned()
            .ok_or_else(|| ModelError::UnknownBatter("no batter is up".into()))?;
        let appearance = team.appearance_count();
        let cursor = self.pitch_cursors.entry((batter.id, appearance)).or_default();
        let at = *cursor;
        *cursor += 1;

        let (recorder, rng) = self.model(side);
        let outcome = recorder.sample_pitch(batter.id, appearance, at, rng)?.outcome;
        debug!(batter = %batter.name, %outcome, "sampled pitch");

        let s = self.machine.snapshot();
        let (balls, strikes) = (s.at_bat_balls, s.at_bat_strikes);
        let (walk_limit, strikes_limit) = (s.balls_per_walk(side), s.strikes_per_out(side));
        let play = match outcome {
            PitchOutcome::Ball if balls + 1 >= walk_limit => self.walk(&batter, side),
            PitchOutcome::Ball => Play::new(
                ActionKind::Ball,
                Count::Ball {
                    balls: balls + 1,
                    strikes,
                },
            ),
            PitchOutcome::StrikeLooking | PitchOutcome::StrikeSwinging => {
                let swinging = outcome == PitchOutcome::StrikeSwinging;
                if strikes + 1 >= strikes_limit {
                    let name = batter.name.clone();
                    let sentence = if swinging {
                        Strikeout::Swinging { batter: name }
                    } else {
                        Strikeout::Looking { batter: name }
                    };
                    Play::new(ActionKind::Strikeout, sentence)
                } else {
                    let call = if swinging { StrikeCall::Swinging } else { StrikeCall::Looking };
                    Play::new(
                        ActionKind::Strike,
                        Count::Strike {
                            call,
                            balls,
                            strikes: strikes + 1,
                        },
                    )
                }
            }
            PitchOutcome::Foul => {
                let strikes = if strikes + 1 < strikes_limit { strikes + 1 } else { strikes };
                Play::new(ActionKind::FoulBall, Count::Foul { balls, strikes })
            }
            PitchOutcome::HomeRun => {
                let runs = self.machine.snapshot().runner_count() as i64 + 1;
                let sentence = HomeRun {
                    batter: batter.name.clone(),
                    runs,
                    refills: Vec::new(),
                };
                Play::new(ActionKind::HomeRun, sentence)
            }
            PitchOutcome::Hit(base) => self.hit(&batter, side, base),
            PitchOutcome::Flyout => self.fielding_out(&batter, side, true),
            PitchOutcome::GroundOut => self.fielding_out(&batter, side, false),
            PitchOutcome::DoublePlay => self.double_play(&batter, side),
            PitchOutcome::FieldersChoice(_) => self.fielders_choice(&batter, side),
        };
        Ok(play)
    }

    /// Give every runner one steal decision, lead runner first. The first
    /// runner who goes for an open base (or home) makes the play.
    fn steal_attempt(&mut self) -> Option<Play> {
        let side = self.machine.batting_side();
        let appearance = self.machine.team(side).appearance_count();
        let home = self.machine.snapshot().base_count(side) - 1;
        let occupied = self.machine.snapshot().bases_occupied.clone();

        let mut attempt = None;
        for runner in self.runners() {
            let key = (runner.id, appearance);
            let at = self.steal_cursors.get(&key).copied().unwrap_or(0);
            self.steal_cursors.insert(key, at + 1);
            let decision = match side {
                Side::Away => self.away.next_steal(runner.id, appearance, at),
                Side::Home => self.home.next_steal(runner.id, appearance, at),
            };
            if attempt.is_some() || decision == StealDecision::Stay {
                continue;
            }
            let target = runner.base + 1;
            if target != home && occupied.contains(&target) {
                continue;
            }
            let Some(base) = Base::from_index(target) else {
                continue;
            };
            attempt = Some((runner, base, decision));
        }

        let (runner, base, decision) = attempt?;
        let sentence = match decision {
            StealDecision::Caught => Steal::Caught {
                runner: runner.name,
                base,
            },
            _ => {
                let blaserunning = self
                    .machine
                    .team(side)
                    .lineup()
                    .iter()
                    .any(|p| p.id == runner.id && p.has_mod(BLASERUNNING))
                    .then(|| runner.name.clone());
                Steal::Stolen {
                    runner: runner.name,
                    base,
                    blaserunning,
                    refills: Vec::new(),
                }
            }
        };
        Some(Play::new(ActionKind::StolenBase, sentence))
    }

    fn walk(&self, batter: &PlayerState, side: Side) -> Play {
        let runners = self.runners();
        let occupied: Vec<i64> = runners.iter().map(|r| r.base).collect();
        let forced = bases::advance(&occupied, Some(0), self.machine.snapshot().base_count(side));
        let scores = forced.scored.iter().rev().map(|i| runners[*i].name.clone()).collect();
        let sentence = Walk {
            batter: batter.name.clone(),
            scores,
            refills: Vec::new(),
        };
        Play::new(ActionKind::Walk, sentence)
    }

    fn hit(&mut self, batter: &PlayerState, side: Side, base: i64) -> Play {
        let base_count = self.machine.snapshot().base_count(side);
        let base = base.clamp(0, (base_count - 2).min(3));
        let kind = HitKind::from_base_index(base).unwrap_or(HitKind::Single);

        let runners = self.runners();
        let desired: Vec<i64> = runners
            .iter()
            .map(|r| {
                let (recorder, rng) = self.model(side);
                r.base + base + 1 + recorder.random_advancement(r.id, rng)
            })
            .collect();
        let resolved = bases::advance(&desired, Some(base), base_count);

        let mut truth = RunnerTruth::default();
        let mut scores = Vec::new();
        for (i, runner) in runners.iter().enumerate() {
            if resolved.scored.contains(&i) {
                scores.push(runner.name.clone());
            } else {
                truth.runners.push(runner.id);
                truth.bases.push(resolved.bases[i]);
            }
        }
        truth.runners.push(batter.id);
        truth.bases.push(base);

        let sentence = Hit {
            batter: batter.name.clone(),
            kind,
            heating_up: None,
            scores,
            refills: Vec::new(),
        };
        Play::new(ActionKind::Hit, sentence).with_truth(truth)
    }

    /// A fly or ground out. Runners may take extra bases unless the out ends
    /// the half.
    fn fielding_out(&mut self, batter: &PlayerState, side: Side, flyout: bool) -> Play {
        let fielders = self.machine.team(side.opponent()).lineup();
        let fielder = fielders[self.rng.random_range(0..fielders.len())].name.clone();

        let s = self.machine.snapshot();
        let ends_half = s.half_inning_outs + 1 >= s.outs_per_inning(side);
        let base_count = s.base_count(side);
        let mut scorers = Vec::new();
        let mut truth = None;
        if !ends_half {
            let runners = self.runners();
            let desired: Vec<i64> = runners
                .iter()
                .map(|r| {
                    let (recorder, rng) = self.model(side);
                    r.base + recorder.random_advancement(r.id, rng)
                })
                .collect();
            let resolved = bases::advance(&desired, None, base_count);
            let mut stays = RunnerTruth::default();
            for (i, runner) in runners.iter().enumerate() {
                if resolved.scored.contains(&i) {
                    scorers.push(runner.name.clone());
                } else {
                    stays.runners.push(runner.id);
                    stays.bases.push(resolved.bases[i]);
                }
            }
            truth = Some(stays);
        }

        let batter = batter.name.clone();
        let (action, sentence) = if flyout {
            let sentence = FieldingOut::Flyout {
                batter,
                fielder,
                tag_ups: scorers,
                refills: Vec::new(),
            };
            (ActionKind::FlyOut, sentence)
        } else {
            let sentence = FieldingOut::GroundOut {
                batter,
                fielder,
                sacrifices: scorers,
                refills: Vec::new(),
            };
            (ActionKind::GroundOut, sentence)
        };
        let play = Play::new(action, sentence);
        match truth {
            Some(truth) => play.with_truth(truth),
            None => play,
        }
    }

    fn double_play(&mut self, batter: &PlayerState, side: Side) -> Play {
        let s = self.machine.snapshot();
        if s.runner_count() == 0 || s.half_inning_outs + 1 >= s.outs_per_inning(side) {
            return self.fielding_out(batter, side, false);
        }
        let sentence = FieldingOut::DoublePlay {
            batter: batter.name.clone(),
            scores: Vec::new(),
            refills: Vec::new(),
        };
        Play::new(ActionKind::GroundOut, sentence)
    }

    /// The trailing runner is forced out and the batter takes first.
    fn fielders_choice(&mut self, batter: &PlayerState, side: Side) -> Play {
        let s = self.machine.snapshot();
        let last_out = s.half_inning_outs + 1 >= s.outs_per_inning(side);
        let trailing = self.runners().pop();
        let forced_to = trailing.as_ref().and_then(|r| Base::from_index(r.base + 1));
        let (Some(runner), Some(base), false) = (trailing, forced_to, last_out) else {
            return self.fielding_out(batter, side, false);
        };
        let sentence = FieldingOut::FieldersChoice {
            runner_out: runner.name,
            base,
            scores: Vec::new(),
            refills: Vec::new(),
            batter: batter.name.clone(),
        };
        Play::new(ActionKind::GroundOut, sentence)
    }
}

impl<R: Roster> Iterator for ReplayGenerator<R> {
    type Item = ModelResult<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.machine.state() == MachineState::Done {
            return None;
        }
        if self.play >= self.config.max_plays {
            warn!(plays = self.play, state = %self.machine.state(), "replay stopped at the play limit");
            self.finished = true;
            return None;
        }

        let result = self.next_play().and_then(|play| {
            let Some(play) = play else {
                return Ok(None);
            };
            let event = NarrationEvent::new(play.action, play.text, self.play, self.created);
            Ok(Some(self.machine.apply(&event, play.truth.as_ref())?))
        });
        self.play += 1;
        match result {
            Ok(Some(snapshot)) => Some(Ok(snapshot)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                warn!(error = %e, play = self.play - 1, "replay failed");
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
