//! Shared fixtures for the model's unit tests.

use chrono::{DateTime, TimeZone, Utc};
use rb_core::ActionKind::{self, *};
use rb_core::{GameSetup, NarrationEvent, PlayerId, PlayerState, SideSetup, StaticRoster, TeamId};
use rb_engine::{GameFeed, ReconstructConfig};

pub struct Fixture {
    pub setup: GameSetup,
    pub roster: StaticRoster,
    pub start: DateTime<Utc>,
    pub away: Vec<PlayerState>,
    pub home: Vec<PlayerState>,
}

/// Tacos at Crabs, three batters a side.
pub fn fixture() -> Fixture {
    let player = |name: &str| PlayerState::new(PlayerId::new(), name);
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
        away,
        home,
    }
}

pub fn created() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 16, 0, 0).unwrap()
}

pub fn one_inning_config() -> ReconstructConfig {
    ReconstructConfig::default().with_regulation_innings(1)
}

/// One event per play, in order.
pub fn feed(f: &Fixture, script: &[(ActionKind, String)]) -> GameFeed {
    let events = script
        .iter()
        .enumerate()
        .map(|(play, (action, text))| NarrationEvent::new(*action, text.as_str(), play as i64, created()))
        .collect();
    GameFeed {
        setup: Some(f.setup.clone()),
        events,
        snapshots: Vec::new(),
    }
}

fn crabs_strike_out(f: &Fixture, script: &mut Vec<(ActionKind, String)>) {
    script.push((HalfInningStart, "Bottom of 1, Baltimore Crabs batting.".into()));
    for crab in &f.home {
        script.push((BatterUp, format!("{} batting for the Crabs.", crab.name)));
        script.push((Strike, "Strike, looking. 0-1".into()));
        script.push((Strike, "Strike, looking. 0-2".into()));
        script.push((Strikeout, format!("{} strikes out looking.", crab.name)));
    }
}

/// Tacos score once in the top of the first and win.
pub fn one_inning(f: &Fixture) -> Vec<(ActionKind, String)> {
    let mut script: Vec<(ActionKind, String)> = vec![
        (LetsGo, "Let's Go!".into()),
        (PlayBall, "Play ball!".into()),
        (HalfInningStart, "Top of 1, Unlimited Tacos batting.".into()),
        (BatterUp, "Alpha Taco batting for the Tacos.".into()),
        (HomeRun, "Alpha Taco hits a solo home run!".into()),
        (BatterUp, "Beta Taco batting for the Tacos.".into()),
        (Strike, "Strike, swinging. 0-1".into()),
        (Strike, "Strike, swinging. 0-2".into()),
        (Strikeout, "Beta Taco strikes out swinging.".into()),
        (BatterUp, "Gamma Taco batting for the Tacos.".into()),
        (FlyOut, "Gamma Taco hit a flyout to Alpha Crab.".into()),
        (BatterUp, "Alpha Taco batting for the Tacos.".into()),
        (GroundOut, "Alpha Taco hit a ground out to Beta Crab.".into()),
    ];
    crabs_strike_out(f, &mut script);
    script.push((GameEnd, "Tacos 1, Crabs 0".into()));
    script
}

/// Alpha walks, steals second, and is caught stealing third. Scoreless, so
/// the feed stops where the inning-end narration would come.
pub fn walk_and_steal(f: &Fixture) -> Vec<(ActionKind, String)> {
    let mut script: Vec<(ActionKind, String)> = vec![
        (LetsGo, "Let's Go!".into()),
        (PlayBall, "Play ball!".into()),
        (HalfInningStart, "Top of 1, Unlimited Tacos batting.".into()),
        (BatterUp, "Alpha Taco batting for the Tacos.".into()),
        (Ball, "Ball. 1-0".into()),
        (Ball, "Ball. 2-0".into()),
        (Ball, "Ball. 3-0".into()),
        (Walk, "Alpha Taco draws a walk.".into()),
        (BatterUp, "Beta Taco batting for the Tacos.".into()),
        (StolenBase, "Alpha Taco steals second base!".into()),
        (Strike, "Strike, looking. 0-1".into()),
        (Strike, "Strike, looking. 0-2".into()),
        (Strikeout, "Beta Taco strikes out looking.".into()),
        (BatterUp, "Gamma Taco batting for the Tacos.".into()),
        (StolenBase, "Alpha Taco gets caught stealing third base.".into()),
        (Strike, "Strike, swinging. 0-1".into()),
        (Strike, "Strike, swinging. 0-2".into()),
        (Strikeout, "Gamma Taco strikes out swinging.".into()),
    ];
    crabs_strike_out(f, &mut script);
    script
}
