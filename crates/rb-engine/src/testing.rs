//! Shared fixtures for the engine's unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rb_core::{ActionKind, GameSetup, NarrationEvent, PlayerId, PlayerState, SideSetup, Snapshot, StaticRoster, TeamId};

use crate::config::ReconstructConfig;
use crate::reconstructor::Reconstructor;

pub struct Fixture {
    pub setup: GameSetup,
    pub roster: StaticRoster,
    pub start: DateTime<Utc>,
    pub away_pitcher: PlayerState,
    pub home_pitcher: PlayerState,
    pub away: Vec<PlayerState>,
    pub home: Vec<PlayerState>,
}

/// Tacos at Crabs, three batters a side.
pub fn fixture() -> Fixture {
    fixture_with(|p| p)
}

/// [`fixture`] with every player passed through `adjust` first.
pub fn fixture_with(adjust: impl Fn(PlayerState) -> PlayerState) -> Fixture {
    let player = |name: &str| adjust(PlayerState::new(PlayerId::new(), name));
    let away_pitcher = player("Taco Pitcher");
    let home_pitcher = player("Crab Pitcher");
    let away: Vec<_> = ["Alpha Taco", "Beta Taco", "Gamma Taco"].into_iter().map(player).collect();
    let home: Vec<_> = ["Alpha Crab", "Beta Crab", "Gamma Crab"].into_iter().map(player).collect();

    let (away_team, home_team) = (TeamId::new(), TeamId::new());
    let mut roster = StaticRoster::new()
        .with_team(away_team, "Tacos", away_pitcher.id, away.iter().map(|p| p.id).collect())
        .with_team(home_team, "Crabs", home_pitcher.id, home.iter().map(|p| p.id).collect());
    for p in [&away_pitcher, &home_pitcher].into_iter().chain(&away).chain(&home) {
        roster = roster.with_player(p.clone());
    }

    let setup = GameSetup {
        day: 1,
        season: 11,
        tournament: -1,
        away: SideSetup::standard(away_team, "Unlimited Tacos", "Tacos"),
        home: SideSetup::standard(home_team, "Baltimore Crabs", "Crabs"),
        ..GameSetup::default()
    };

    Fixture {
        setup,
        roster,
        start: created(),
        away_pitcher,
        home_pitcher,
        away,
        home,
    }
}

pub fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 16, 0, 0).unwrap()
}

pub fn machine(f: &Fixture) -> Reconstructor<StaticRoster> {
    Reconstructor::new(&f.setup, f.roster.clone(), f.start, ReconstructConfig::default()).unwrap()
}

pub fn event(action: ActionKind, text: &str) -> NarrationEvent {
    NarrationEvent::new(action, text, 0, created())
}

pub fn run<R: rb_core::Roster>(m: &mut Reconstructor<R>, events: &[(ActionKind, &str)]) -> Snapshot {
    let mut last = m.snapshot().clone();
    for (action, text) in events {
        last = m.apply(&event(*action, text), None).unwrap();
    }
    last
}

/// Play the opening through the first batter stepping up.
pub fn to_first_pitch<R: rb_core::Roster>(m: &mut Reconstructor<R>) -> Snapshot {
    run(
        m,
        &[
            (ActionKind::LetsGo, "Let's Go!"),
            (ActionKind::PlayBall, "Play ball!"),
            (ActionKind::HalfInningStart, "Top of 1, Unlimited Tacos batting."),
            (ActionKind::BatterUp, "Alpha Taco batting for the Tacos."),
        ],
    )
}

pub fn batter_up<R: rb_core::Roster>(m: &mut Reconstructor<R>, batter: &str, team: &str) -> Snapshot {
    let text = format!("{batter} batting for the {team}.");
    run(m, &[(ActionKind::BatterUp, &text)])
}

/// Two called strikes, then the strikeout.
pub fn strike_out<R: rb_core::Roster>(m: &mut Reconstructor<R>, batter: &str) -> Snapshot {
    let balls = m.snapshot().at_bat_balls;
    let first = format!("Strike, looking. {balls}-1");
    let second = format!("Strike, looking. {balls}-2");
    let out = format!("{batter} strikes out looking.");
    run(
        m,
        &[
            (ActionKind::Strike, &first),
            (ActionKind::Strike, &second),
            (ActionKind::Strikeout, &out),
        ],
    )
}
