//! Turning a game feed into replay material.

use chrono::{DateTime, Utc};
use rb_core::{ActionKind, GameSetup, Roster, Side, Snapshot, TeamState};
use rb_engine::{GameFeed, ReconstructConfig, Reconstructor};
use tracing::info;

use crate::config::ModelConfig;
use crate::error::ModelResult;
use crate::recorder::Recorder;
use crate::replay::ReplayGenerator;

/// A reconstructed game together with what each side did in it.
#[derive(Debug, Clone)]
pub struct RecordedGame {
    /// The game's setup.
    pub setup: GameSetup,
    /// When the first event was emitted.
    pub start: DateTime<Utc>,
    /// Reconstructed snapshots, one per event.
    pub snapshots: Vec<Snapshot>,
    /// The away side's record.
    pub away: Recorder,
    /// The home side's record.
    pub home: Recorder,
}

impl RecordedGame {
    /// Replay this game from its records.
    pub fn into_replay<R: Roster>(self, roster: R, config: ModelConfig) -> ModelResult<ReplayGenerator<R>> {
        ReplayGenerator::new(&self.setup, roster, self.start, self.away, self.home, config)
    }
}

/// Reconstruct a feed while recording both sides.
///
/// Each event is recorded by the side at bat before it, together with the
/// last observed snapshot and the one following the event. Substitutions
/// reach both recorders.
pub fn record_game<R: Roster>(feed: &GameFeed, roster: &R, config: &ReconstructConfig) -> ModelResult<RecordedGame> {
    let setup = feed.setup()?;
    let start = feed.start_time()?;
    let mut machine = Reconstructor::new(&setup, roster, start, config.clone())?;
    let mut away = Recorder::new(TeamState::from_record(roster.team_at(setup.away.team, start)?)?);
    let mut home = Recorder::new(TeamState::from_record(roster.team_at(setup.home.team, start)?)?);

    let paired = feed.paired_events()?;
    let mut snapshots = Vec::with_capacity(paired.len());
    let mut last_observed: Option<&Snapshot> = None;
    for (event, observed) in paired {
        let pre = machine.snapshot().clone();
        snapshots.push(machine.step(event, observed)?);

        match event.action() {
            ActionKind::Incineration | ActionKind::FeedbackSwap => {
                away.replace_player(event, roster)?;
                home.replace_player(event, roster)?;
            }
            _ => {
                let recorder = match pre.batting_side() {
                    Side::Away => &mut away,
                    Side::Home => &mut home,
                };
                recorder.record(event, &pre, last_observed, observed)?;
            }
        }
        if observed.is_some() {
            last_observed = observed;
        }
    }

    info!(
        game = %setup.id,
        snapshots = snapshots.len(),
        away_pitches = away.pitches().len(),
        home_pitches = home.pitches().len(),
        "recorded game"
    );
    Ok(RecordedGame {
        setup,
        start,
        snapshots,
        away,
        home,
    })
}

#[cfg(test)]
mod tests {
    use rb_core::ActionKind::*;

    use super::*;
    use crate::pitch::{PitchOutcome, StealDecision};
    use crate::testing::*;

    #[test]
    fn each_side_records_its_own_batters() {
        let f = fixture();
        let game = record_game(&feed(&f, &one_inning(&f)), &f.roster, &one_inning_config()).unwrap();

        let away: Vec<_> = game.away.pitches().iter().map(|p| p.outcome).collect();
        assert_eq!(
            away,
            vec![
                PitchOutcome::HomeRun,
                PitchOutcome::StrikeSwinging,
                PitchOutcome::StrikeSwinging,
                PitchOutcome::StrikeSwinging,
                PitchOutcome::Flyout,
                PitchOutcome::GroundOut,
            ]
        );
        assert_eq!(game.home.pitches().len(), 9);
        assert!(game.home.pitches().iter().all(|p| p.outcome == PitchOutcome::StrikeLooking));
        assert!(game.snapshots.last().unwrap().finalized);
    }

    #[test]
    fn second_time_through_the_order_is_a_new_appearance() {
        let f = fixture();
        let game = record_game(&feed(&f, &one_inning(&f)), &f.roster, &one_inning_config()).unwrap();
        let alpha = f.away[0].id;
        assert_eq!(game.away.pitches_for(alpha, 0)[0].outcome, PitchOutcome::HomeRun);
        assert_eq!(game.away.pitches_for(alpha, 1)[0].outcome, PitchOutcome::GroundOut);
    }

    #[test]
    fn steals_are_recorded_against_the_runner() {
        let f = fixture();
        let game = record_game(&feed(&f, &walk_and_steal(&f)), &f.roster, &one_inning_config()).unwrap();
        let alpha = f.away[0].id;
        assert_eq!(game.away.next_steal(alpha, 0, 0), StealDecision::Attempt);
        assert_eq!(game.away.next_steal(alpha, 0, 1), StealDecision::Stay);
        assert_eq!(game.away.next_steal(alpha, 0, 4), StealDecision::Caught);
    }

    #[test]
    fn substitution_reaches_the_recorders() {
        let f = fixture();
        let ashes = rb_core::PlayerState::new(rb_core::PlayerId::new(), "Ashes Crab");
        let roster = f.roster.clone().with_player(ashes.clone());
        let mut script = one_inning(&f);
        script.truncate(3);
        let mut feed = feed(&f, &script);
        feed.events.push(
            rb_core::NarrationEvent::new(Incineration, "Rogue Umpire incinerated Beta Crab!", 3, created())
                .with_tags(vec![f.home[1].id, ashes.id]),
        );

        let game = record_game(&feed, &roster, &one_inning_config()).unwrap();
        assert_eq!(game.home.team().lineup()[1].name, "Ashes Crab");
        assert_eq!(game.away.team().lineup()[1].name, "Beta Taco");
    }
}
