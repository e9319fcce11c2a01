use rb_core::{ActionKind, NarrationEvent, Roster};
use rb_parse::ast::{Blooddrain, Count, FieldingOut, MildPitchOutcome, SiphonEffect, Steal, Strikeout};
use rb_parse::parser::{
    parse_blooddrain, parse_count, parse_fielding_out, parse_hit, parse_home_run, parse_mild_pitch, parse_steal,
    parse_strikeout, parse_walk,
};

use crate::error::{GameError, GameResult};
use crate::reconstructor::{Reconstructor, RunnerTruth};
use crate::state::MachineState;

impl<R: Roster> Reconstructor<R> {
    pub(crate) fn steal(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_steal(&event.description)?;
        let (runner, base) = match &parsed {
            Steal::Stolen { runner, base, .. } | Steal::Caught { runner, base } => (runner.clone(), base.index()),
        };

        // Only the runner one base short of the target can attempt it.
        let index = self
            .snapshot
            .runner_on_base(base - 1)
            .ok_or_else(|| self.violation(format!("nobody on base {} to steal base {base}", base - 1)))?;
        let on_base = &self.snapshot.base_runner_names[index];
        self.ensure(*on_base == runner, || format!("{runner} steals but {on_base} is the runner"))?;

        match parsed {
            Steal::Stolen {
                blaserunning, refills, ..
            } => {
                self.snapshot.bases_occupied[index] += 1;
                let mut runs = 0.0;
                let mut scored = false;
                if let Some(name) = blaserunning {
                    self.ensure(name == runner, || format!("{name} scores with Blaserunning but {runner} stole"))?;
                    runs += self.score_runs(0.2);
                    scored = true;
                }
                if base + 1 == self.snapshot.base_count(self.batting_side()) {
                    self.snapshot.remove_runner(index);
                    runs += self.score_runs(1.0);
                    scored = true;
                }
                if scored {
                    self.apply_refills(&refills, std::slice::from_ref(&runner))?;
                } else {
                    self.ensure(refills.is_empty(), || "Free Refill on a steal that scored nothing".into())?;
                }
                self.record_runs(runs);
            }
            Steal::Caught { .. } => {
                self.snapshot.remove_runner(index);
                self.out(false);
            }
        }

        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    pub(crate) fn walk(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_walk(&event.description)?;
        let batter = self.current_batter()?;
        self.ensure(parsed.batter == batter.name, || {
            format!("{} draws a walk but {} is batting", parsed.batter, batter.name)
        })?;

        let mut runs = self.score_named(&parsed.scores)?;
        self.apply_refills(&parsed.refills, &parsed.scores)?;
        runs += self.place_on_base(&batter, 0);
        self.record_runs(runs);

        self.snapshot.last_update = event.description.clone();
        self.end_at_bat();
        Ok(())
    }

    pub(crate) fn strikeout(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_strikeout(&event.description)?;
        let batter = self.current_batter()?;
        self.ensure(parsed.batter() == batter.name, || {
            format!("{} strikes out but {} is batting", parsed.batter(), batter.name)
        })?;

        let limit = self.snapshot.strikes_per_out(self.batting_side());
        match &parsed {
            Strikeout::Charmed { pitcher, swings, .. } => {
                let expected = &self.fielding_pitcher().name;
                self.ensure(pitcher == expected, || format!("{pitcher} charmed but {expected} is pitching"))?;
                self.ensure(*swings == limit, || format!("{swings} charmed swings with {limit} strikes per out"))?;
            }
            Strikeout::Swinging { .. } | Strikeout::Looking { .. } => {
                let strikes = self.snapshot.at_bat_strikes;
                self.ensure(strikes + 1 == limit, || {
                    format!("strikeout with {strikes} strikes and {limit} strikes per out")
                })?;
            }
        }

        self.snapshot.last_update = event.description.clone();
        self.out(true);
        Ok(())
    }

    pub(crate) fn fielding_out(&mut self, event: &NarrationEvent, truth: Option<&RunnerTruth>) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_fielding_out(&event.description)?;
        let flyout = matches!(parsed, FieldingOut::Flyout { .. });
        self.ensure(flyout == (self.action == ActionKind::FlyOut), || {
            format!("{} narrated as {parsed}", self.action)
        })?;

        let batter = self.current_batter()?;
        self.ensure(parsed.batter() == batter.name, || {
            format!("{} hit the ball but {} is batting", parsed.batter(), batter.name)
        })?;

        let side = self.batting_side();
        let limit = self.snapshot.outs_per_inning(side);
        let mut runs = 0.0;
        match &parsed {
            FieldingOut::GroundOut { fielder, .. } | FieldingOut::Flyout { fielder, .. } => {
                let fielding = self.team(side.opponent());
                self.ensure(fielding.lineup().iter().any(|p| p.name == *fielder), || {
                    format!("{fielder} is not in the fielding lineup")
                })?;
                runs += self.score_named(parsed.scorers())?;
            }
            FieldingOut::DoublePlay { .. } => {
                self.snapshot.half_inning_outs += 1;
                let outs = self.snapshot.half_inning_outs;
                self.ensure(outs < limit, || "first out of a double play ended the half-inning".into())?;
                runs += self.score_named(parsed.scorers())?;
                if outs + 1 < limit {
                    let index = self.double_play_victim(truth)?;
                    self.snapshot.remove_runner(index);
                }
            }
            FieldingOut::FieldersChoice { runner_out, base, .. } => {
                let index = self.fielders_choice_victim(runner_out, base.index())?;
                self.snapshot.remove_runner(index);
                runs += self.score_named(parsed.scorers())?;
            }
        }
        self.apply_refills(parsed.refills(), parsed.scorers())?;
        if matches!(parsed, FieldingOut::FieldersChoice { .. }) {
            runs += self.place_on_base(&batter, 0);
        }
        self.record_runs(runs);

        self.snapshot.last_update = event.description.clone();
        self.out(true);
        self.copy_truth(truth)
    }

    /// The runner put out on the back end of a double play.
    ///
    /// With truth, the one runner missing afterwards. Without it, the only
    /// runner, else the trailing runner (the force at the lowest base).
    fn double_play_victim(&self, truth: Option<&RunnerTruth>) -> GameResult<usize> {
        if let Some(truth) = truth {
            let gone: Vec<usize> = self
                .snapshot
                .base_runners
                .iter()
                .enumerate()
                .filter(|(_, id)| !truth.runners.contains(*id))
                .map(|(i, _)| i)
                .collect();
            return match gone.as_slice() {
                [index] => Ok(*index),
                _ => Err(GameError::Consistency {
                    play: self.play,
                    fields: vec!["baseRunners".into()],
                }),
            };
        }
        match self.snapshot.runner_count() {
            0 => Err(self.violation("double play with nobody on base")),
            n => Ok(n - 1),
        }
    }

    /// The runner named out on a fielder's choice.
    ///
    /// Same-named runners are told apart by who was forced to the named base.
    fn fielders_choice_victim(&self, name: &str, base: i64) -> GameResult<usize> {
        let candidates: Vec<usize> = self
            .snapshot
            .base_runner_names
            .iter()
            .enumerate()
            .filter(|(_, n)| *n == name)
            .map(|(i, _)| i)
            .collect();
        match candidates.as_slice() {
            [] => Err(self.violation(format!("{name} is out at a base but not on base"))),
            [only] => Ok(*only),
            several => Ok(several
                .iter()
                .copied()
                .find(|i| self.snapshot.bases_occupied[*i] == base - 1)
                .unwrap_or(several[0])),
        }
    }

    pub(crate) fn hit(&mut self, event: &NarrationEvent, truth: Option<&RunnerTruth>) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_hit(&event.description)?;
        let batter = self.current_batter()?;
        self.ensure(parsed.batter == batter.name, || {
            format!("{} hits but {} is batting", parsed.batter, batter.name)
        })?;
        if let Some(name) = &parsed.heating_up {
            self.ensure(*name == batter.name, || format!("{name} is Heating Up but did not bat"))?;
        }

        let mut runs = self.score_named(&parsed.scores)?;
        self.apply_refills(&parsed.refills, &parsed.scores)?;
        runs += self.place_on_base(&batter, parsed.kind.base_index());
        self.record_runs(runs);

        self.snapshot.last_update = event.description.clone();
        self.end_at_bat();
        self.copy_truth(truth)
    }

    pub(crate) fn home_run(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_home_run(&event.description)?;
        let batter = self.current_batter()?;
        self.ensure(parsed.batter == batter.name, || {
            format!("{} homers but {} is batting", parsed.batter, batter.name)
        })?;

        let mut scorers = self.snapshot.base_runner_names.clone();
        scorers.push(batter.name.clone());
        self.apply_refills(&parsed.refills, &scorers)?;

        let on_base = self.snapshot.runner_count() as i64;
        self.ensure(parsed.runs == on_base + 1, || {
            format!("{}-run home run with {on_base} on base", parsed.runs)
        })?;

        let mut runs = self.score_runs(1.0);
        while self.snapshot.remove_runner(0).is_some() {
            runs += self.score_runs(1.0);
        }
        self.record_runs(runs);

        self.snapshot.last_update = event.description.clone();
        self.end_at_bat();
        Ok(())
    }

    /// Balls, strikes, and fouls. The narrated count must match the updated one.
    pub(crate) fn count(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_count(&event.description)?;
        let limit = self.snapshot.strikes_per_out(self.batting_side());

        let s = &mut self.snapshot;
        let kind_matches = match (self.action, &parsed) {
            (ActionKind::Ball, Count::Ball { .. }) => {
                s.at_bat_balls += 1;
                true
            }
            (ActionKind::Strike, Count::Strike { .. }) => {
                s.at_bat_strikes += 1;
                true
            }
            (ActionKind::FoulBall, Count::Foul { .. }) => {
                if s.at_bat_strikes + 1 < limit {
                    s.at_bat_strikes += 1;
                }
                true
            }
            _ => false,
        };
        self.ensure(kind_matches, || format!("{} narrated as {parsed}", self.action))?;

        let count = (self.snapshot.at_bat_balls, self.snapshot.at_bat_strikes);
        self.ensure(parsed.count() == count, || format!("count should be {}-{}", count.0, count.1))?;

        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    pub(crate) fn strike_zapped(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        self.expect_text(event, "The Electricity zaps a strike away!")?;
        self.ensure(self.snapshot.at_bat_strikes > 0, || "no strike to zap".into())?;

        self.snapshot.at_bat_strikes -= 1;
        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    pub(crate) fn mild_pitch(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_mild_pitch(&event.description)?;
        let pitcher = &self.fielding_pitcher().name;
        self.ensure(parsed.pitcher == *pitcher, || {
            format!("{} threw a Mild pitch but {pitcher} is pitching", parsed.pitcher)
        })?;

        let mut runs = self.score_named(&parsed.scores)?;
        match &parsed.outcome {
            MildPitchOutcome::Ball {
                balls,
                strikes,
                runners_advance,
            } => {
                self.snapshot.at_bat_balls += 1;
                let count = (self.snapshot.at_bat_balls, self.snapshot.at_bat_strikes);
                self.ensure((*balls, *strikes) == count, || {
                    format!("count should be {}-{}", count.0, count.1)
                })?;
                if *runners_advance {
                    runs += self.advance_all_runners();
                }
            }
            MildPitchOutcome::Walk { batter: walker } => {
                let batter = self.current_batter()?;
                self.ensure(*walker == batter.name, || format!("{walker} walks but {} is batting", batter.name))?;
                runs += self.place_on_base(&batter, 0);
                self.end_at_bat();
            }
        }
        self.record_runs(runs);

        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    pub(crate) fn blooddrain(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitPitch)?;
        let parsed = parse_blooddrain(&event.description)?;

        if let Blooddrain::Siphon {
            effect, struck_out, ..
        } = &parsed
        {
            let side = self.batting_side();
            let strikes_per_out = self.snapshot.strikes_per_out(side);
            let s = &mut self.snapshot;
            let mut strikeout = false;
            let ok = match effect {
                SiphonEffect::AddBall => {
                    s.at_bat_balls += 1;
                    true
                }
                SiphonEffect::RemoveBall => {
                    s.at_bat_balls -= 1;
                    s.at_bat_balls >= 0
                }
                SiphonEffect::AddStrike => {
                    s.at_bat_strikes += 1;
                    strikeout = s.at_bat_strikes >= strikes_per_out;
                    true
                }
                SiphonEffect::RemoveStrike => {
                    s.at_bat_strikes -= 1;
                    s.at_bat_strikes >= 0
                }
                SiphonEffect::AddOut => true,
                SiphonEffect::RemoveOut => {
                    s.half_inning_outs -= 1;
                    s.half_inning_outs >= 0
                }
            };
            self.ensure(ok, || format!("siphon {effect} leaves a negative count"))?;

            match (strikeout, struck_out) {
                (true, Some(name)) => {
                    let batter = self.current_batter()?;
                    self.ensure(*name == batter.name, || format!("{name} struck out but {} is batting", batter.name))?;
                    self.out(true);
                }
                (false, None) => {
                    if *effect == SiphonEffect::AddOut {
                        self.out(false);
                    }
                }
                (true, None) => return Err(self.violation("siphoned strike completes a strikeout nobody narrated")),
                (false, Some(name)) => return Err(self.violation(format!("{name} struck out without enough strikes"))),
            }
        }

        self.snapshot.last_update = event.description.clone();
        Ok(())
    }
}
