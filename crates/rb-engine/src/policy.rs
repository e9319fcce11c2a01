use rb_core::bases;
use rb_core::player::{COFFEE_RALLY, ModSlot};
use rb_core::{PlayerState, Roster};

use crate::error::{GameError, GameResult};
use crate::reconstructor::{Reconstructor, RunnerTruth};
use crate::state::MachineState;

/// Render a run total the way the feed does: integral totals without a
/// fractional part, partial credit as a decimal.
pub fn format_runs(runs: f64) -> String {
    if runs.fract() == 0.0 {
        format!("{}", runs as i64)
    } else {
        format!("{runs}")
    }
}

impl<R: Roster> Reconstructor<R> {
    /// Credit runs to the batting side, its half-inning, and its inning half.
    pub(crate) fn score_runs(&mut self, runs: f64) -> f64 {
        let side = self.batting_side();
        *self.snapshot.score_mut(side) += runs;
        self.snapshot.half_inning_score += runs;
        *self.snapshot.inning_score_mut() += runs;
        runs
    }

    /// Take the named runner off base and score them.
    pub(crate) fn score_player(&mut self, name: &str) -> GameResult<f64> {
        let index = self
            .snapshot
            .base_runner_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| self.violation(format!("{name} scores but is not on base")))?;
        self.snapshot.remove_runner(index);
        Ok(self.score_runs(1.0))
    }

    /// Score every named runner, in narration order.
    pub(crate) fn score_named(&mut self, names: &[String]) -> GameResult<f64> {
        let mut runs = 0.0;
        for name in names {
            runs += self.score_player(name)?;
        }
        Ok(runs)
    }

    /// Set the one-shot score message for this play.
    pub(crate) fn record_runs(&mut self, runs: f64) {
        if (runs - 1.0).abs() < f64::EPSILON {
            self.snapshot.score_update = "1 Run scored!".into();
        } else if runs != 0.0 {
            self.snapshot.score_update = format!("{} Runs scored!", format_runs(runs));
        }
    }

    /// Put a player on `base`, forcing runners ahead as needed.
    ///
    /// Returns the runs forced home.
    pub(crate) fn place_on_base(&mut self, player: &PlayerState, base: i64) -> f64 {
        let side = self.batting_side();
        let result = bases::advance(&self.snapshot.bases_occupied, Some(base), self.snapshot.base_count(side));
        self.snapshot.push_runner(player, base);
        self.snapshot.bases_occupied = result.bases;
        self.score_forced(&result.scored)
    }

    /// Move every runner up one base. Returns the runs that crossed home.
    pub(crate) fn advance_all_runners(&mut self) -> f64 {
        let side = self.batting_side();
        let desired: Vec<i64> = self.snapshot.bases_occupied.iter().map(|b| b + 1).collect();
        let result = bases::advance(&desired, None, self.snapshot.base_count(side));
        self.snapshot.bases_occupied = result.bases;
        self.score_forced(&result.scored)
    }

    fn score_forced(&mut self, scored: &[usize]) -> f64 {
        let mut runs = 0.0;
        for index in scored {
            self.snapshot.remove_runner(*index);
            runs += self.score_runs(1.0);
        }
        runs
    }

    /// Charge an out to the batting side.
    ///
    /// Reaching the limit ends the half-inning. Otherwise a batter's out ends
    /// the at-bat and a runner's out leaves the batter up.
    pub(crate) fn out(&mut self, for_batter: bool) {
        self.snapshot.half_inning_outs += 1;
        let side = self.batting_side();
        if self.snapshot.half_inning_outs >= self.snapshot.outs_per_inning(side) {
            if !for_batter {
                // The batter never finished; they lead off the team's next half.
                *self.snapshot.team_batter_count_mut(side) -= 1;
                self.team_mut(side).rewind_batter();
            }
            self.end_half_inning();
        } else if for_batter {
            self.end_at_bat();
        }
    }

    pub(crate) fn end_at_bat(&mut self) {
        let side = self.batting_side();
        self.snapshot.set_batter(side, None);
        self.snapshot.at_bat_balls = 0;
        self.snapshot.at_bat_strikes = 0;
        self.haunter = None;
        self.state = MachineState::AwaitBatterUp;
    }

    fn end_half_inning(&mut self) {
        self.end_at_bat();

        let s = &mut self.snapshot;
        s.clear_runners();
        s.half_inning_outs = 0;
        s.phase = 3;
        if !s.top_of_inning {
            s.top_inning_score = 0.0;
            s.bottom_inning_score = 0.0;
            s.half_inning_score = 0.0;
        }

        let side = s.batting_side();
        let late = s.inning >= self.config.regulation_innings - 1;
        if late && s.score(side) < s.score(side.opponent()) {
            self.end_game();
            return;
        }
        self.state = if s.top_of_inning {
            MachineState::AwaitHalfInningStart
        } else {
            MachineState::AwaitInningEnd
        };
    }

    fn end_game(&mut self) {
        let s = &mut self.snapshot;
        s.top_inning_score = 0.0;
        s.bottom_inning_score = 0.0;
        s.half_inning_score = 0.0;
        s.phase = 7;
        self.state = MachineState::AwaitGameEnd;
    }

    /// Apply free refills: each one takes back an out and consumes the mod.
    ///
    /// The refiller must be one of `scorers`, the fielding pitcher, or the
    /// batter. A pitcher holding the mod under that name uses it first;
    /// otherwise exactly one batting-lineup player of that name must hold it.
    pub(crate) fn apply_refills(&mut self, refills: &[String], scorers: &[String]) -> GameResult<()> {
        for name in refills {
            let batter = self.current_batter().ok();
            let pitcher_name = self.fielding_pitcher().name.clone();
            let known = scorers.contains(name)
                || *name == pitcher_name
                || batter.as_ref().is_some_and(|b| b.name == *name);
            self.ensure(known, || format!("{name} used a Free Refill but is not involved in the play"))?;

            self.snapshot.half_inning_outs -= 1;

            let fielding = self.snapshot.fielding_side();
            if *name == pitcher_name && self.fielding_pitcher().has_mod(COFFEE_RALLY) {
                let pitcher = &mut self.team_mut(fielding).pitcher;
                pitcher.remove_mod(COFFEE_RALLY);
                let summary = pitcher.mod_summary(ModSlot::Pitcher);
                *self.snapshot.pitcher_mod_mut(fielding) = summary;
                continue;
            }

            let batting = self.batting_side();
            let holders: Vec<usize> = self
                .team(batting)
                .lineup()
                .iter()
                .enumerate()
                .filter(|(_, p)| p.name == *name && p.has_mod(COFFEE_RALLY))
                .map(|(i, _)| i)
                .collect();
            let [slot] = holders.as_slice() else {
                return Err(self.violation(format!(
                    "{} batting-lineup players named {name} hold a Free Refill",
                    holders.len()
                )));
            };

            let refiller = &mut self.team_mut(batting).lineup_mut()[*slot];
            refiller.remove_mod(COFFEE_RALLY);
            let refiller = refiller.clone();

            if batter.is_some_and(|b| b.id == refiller.id) {
                *self.snapshot.batter_mod_mut(batting) = refiller.mod_summary(ModSlot::Batter);
            }
            let runner_mod = refiller.mod_summary(ModSlot::Runner);
            let s = &mut self.snapshot;
            for (id, summary) in s.base_runners.iter().zip(s.base_runner_mods.iter_mut()) {
                if *id == refiller.id {
                    *summary = runner_mod.clone();
                }
            }
        }
        Ok(())
    }

    /// Replace reconstructed bases with observed ones after a play whose
    /// advancement the narration does not spell out.
    pub(crate) fn copy_truth(&mut self, truth: Option<&RunnerTruth>) -> GameResult<()> {
        let Some(truth) = truth else {
            return Ok(());
        };
        if truth.bases.len() != self.snapshot.runner_count() {
            return Err(GameError::Consistency {
                play: self.play,
                fields: vec!["basesOccupied".into()],
            });
        }
        self.snapshot.bases_occupied = truth.bases.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_runs_drops_integral_fraction() {
        assert_eq!(format_runs(3.0), "3");
        assert_eq!(format_runs(0.0), "0");
        assert_eq!(format_runs(1.2), "1.2");
    }
}
