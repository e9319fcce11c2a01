use chrono::{DateTime, Duration, Utc};
use rb_core::{ActionKind, GameSetup, NarrationEvent, PlayerId, PlayerState, Roster, Side, Snapshot, TeamState};
use rb_parse::parser::parse_half_inning;
use tracing::debug;

use crate::config::ReconstructConfig;
use crate::error::{GameError, GameResult};
use crate::policy::format_runs;
use crate::state::MachineState;

/// Where the runners really stood after a play.
///
/// Taken from an observed snapshot. Runner advancement on hits and outs cannot
/// be recovered from narration alone, so when this is available the observed
/// bases replace the reconstructed ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerTruth {
    /// Runner ids, lead runner first.
    pub runners: Vec<PlayerId>,
    /// Occupied bases, index-aligned with `runners`.
    pub bases: Vec<i64>,
}

impl RunnerTruth {
    /// Runner positions recorded in an observed snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            runners: snapshot.base_runners.clone(),
            bases: snapshot.bases_occupied.clone(),
        }
    }
}

/// The reconstruction state machine for one game.
///
/// Owns both [`TeamState`]s and the evolving [`Snapshot`]. Feed it events in
/// narration order with [`apply`](Self::apply) or [`step`](Self::step).
pub struct Reconstructor<R> {
    pub(crate) roster: R,
    pub(crate) config: ReconstructConfig,
    pub(crate) state: MachineState,
    pub(crate) snapshot: Snapshot,
    pub(crate) away: TeamState,
    pub(crate) home: TeamState,
    pub(crate) haunter: Option<PlayerState>,
    pub(crate) action: ActionKind,
    pub(crate) play: i64,
}

impl<R> std::fmt::Debug for Reconstructor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconstructor")
            .field("state", &self.state)
            .field("play_count", &self.snapshot.play_count)
            .field("inning", &self.snapshot.inning)
            .field("top_of_inning", &self.snapshot.top_of_inning)
            .finish()
    }
}

impl<R: Roster> Reconstructor<R> {
    /// Load both teams from the roster as of `at` and start before "Let's Go!".
    pub fn new(setup: &GameSetup, roster: R, at: DateTime<Utc>, config: ReconstructConfig) -> GameResult<Self> {
        let away = TeamState::from_record(roster.team_at(setup.away.team, at)?)?;
        let home = TeamState::from_record(roster.team_at(setup.home.team, at)?)?;
        Ok(Self {
            roster,
            config,
            state: MachineState::AwaitStart,
            snapshot: Snapshot::new(setup),
            away,
            home,
            haunter: None,
            action: ActionKind::LetsGo,
            play: 0,
        })
    }

    /// Current machine state.
    pub fn state(&self) -> MachineState {
        self.state
    }

    /// The snapshot as of the last processed event.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// One side's roster view.
    pub fn team(&self, side: Side) -> &TeamState {
        match side {
            Side::Away => &self.away,
            Side::Home => &self.home,
        }
    }

    /// The side at bat.
    pub fn batting_side(&self) -> Side {
        self.snapshot.batting_side()
    }

    /// The configuration this machine runs with.
    pub fn config(&self) -> &ReconstructConfig {
        &self.config
    }

    /// Apply one narration event and return the snapshot that follows it.
    ///
    /// `truth`, when given, supplies the real runner positions after the play.
    pub fn apply(&mut self, event: &NarrationEvent, truth: Option<&RunnerTruth>) -> GameResult<Snapshot> {
        let action = event.action();
        self.action = action;
        self.play = event.metadata.play;
        debug!(
            play = event.metadata.play,
            sub_play = event.metadata.sub_play,
            code = event.code,
            state = %self.state,
            "applying narration event"
        );

        self.snapshot.score_update.clear();
        let divergent = self.dispatch(action, event, truth)?;

        self.snapshot
            .check_invariants()
            .map_err(|e| self.violation(e.to_string()))?;
        if self.state == MachineState::AwaitPitch {
            let limit = self.snapshot.outs_per_inning(self.batting_side());
            let outs = self.snapshot.half_inning_outs;
            if !(0..limit).contains(&outs) {
                return Err(self.violation(format!("{outs} outs with {limit} outs per inning")));
            }
        }

        if let Some(special) = divergent {
            return Ok(special);
        }
        self.snapshot.play_count += 1;
        Ok(self.snapshot.clone())
    }

    /// Apply an event with runner truth from `observed`, then check the result
    /// against it when verification is enabled.
    pub fn step(&mut self, event: &NarrationEvent, observed: Option<&Snapshot>) -> GameResult<Snapshot> {
        let truth = observed.map(RunnerTruth::from_snapshot);
        let produced = self.apply(event, truth.as_ref())?;
        if self.config.verify
            && let Some(observed) = observed
        {
            let fields = produced.diff(observed);
            if !fields.is_empty() {
                return Err(GameError::Consistency {
                    play: event.metadata.play,
                    fields,
                });
            }
        }
        Ok(produced)
    }

    fn dispatch(
        &mut self,
        action: ActionKind,
        event: &NarrationEvent,
        truth: Option<&RunnerTruth>,
    ) -> GameResult<Option<Snapshot>> {
        match action {
            ActionKind::LetsGo => self.lets_go(event)?,
            ActionKind::PlayBall => return self.play_ball(event).map(Some),
            ActionKind::HalfInningStart => self.half_inning_start(event)?,
            ActionKind::BatterUp => self.batter_up(event)?,
            ActionKind::ShelledBatter => self.shelled_batter(event)?,
            ActionKind::StolenBase => self.steal(event)?,
            ActionKind::Walk => self.walk(event)?,
            ActionKind::Strikeout => self.strikeout(event)?,
            ActionKind::FlyOut | ActionKind::GroundOut => self.fielding_out(event, truth)?,
            ActionKind::HomeRun => self.home_run(event)?,
            ActionKind::Hit => self.hit(event, truth)?,
            ActionKind::Ball | ActionKind::Strike | ActionKind::FoulBall => self.count(event)?,
            ActionKind::StrikeZapped => self.strike_zapped(event)?,
            ActionKind::MildPitch => self.mild_pitch(event)?,
            ActionKind::BlooddrainDrain | ActionKind::BlooddrainSiphon | ActionKind::BlooddrainBlocked => {
                self.blooddrain(event)?
            }
            ActionKind::PeanutFlavor => self.flavor(event, MachineState::AwaitPitch)?,
            ActionKind::Superyummy => self.flavor(event, MachineState::AwaitBatterUp)?,
            ActionKind::InningEnd => self.inning_end(event)?,
            ActionKind::GameEnd => self.game_end(event)?,
            ActionKind::Incineration | ActionKind::FeedbackSwap => self.substitution(event)?,
            ActionKind::Other(code) => {
                return Err(self.violation(format!("no handler for action code {code}")));
            }
        }
        Ok(None)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    fn lets_go(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitStart)?;
        self.expect_text(event, "Let's Go!")?;

        let s = &mut self.snapshot;
        s.last_update = event.description.clone();
        s.game_start = true;
        s.phase = 1;
        s.set_pitcher(Side::Away, Some(&self.away.pitcher));
        s.set_pitcher(Side::Home, Some(&self.home.pitcher));
        s.away_team_batter_count = -1;
        s.home_team_batter_count = -1;

        self.state = MachineState::AwaitPlayBall;
        Ok(())
    }

    /// Returns the broadcast copy, which shows no pitchers, while the stored
    /// snapshot keeps them.
    fn play_ball(&mut self, event: &NarrationEvent) -> GameResult<Snapshot> {
        self.expect_state(MachineState::AwaitPlayBall)?;
        self.expect_text(event, "Play ball!")?;

        let s = &mut self.snapshot;
        s.phase = 2;
        s.inning = -1;
        s.last_update = event.description.clone();
        s.top_of_inning = false;
        s.play_count += 1;

        let mut special = s.clone();
        special.set_pitcher(Side::Away, None);
        special.set_pitcher(Side::Home, None);
        special.home_team_batter_count = -1;

        self.state = MachineState::AwaitHalfInningStart;
        Ok(special)
    }

    fn half_inning_start(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitHalfInningStart)?;
        let parsed = parse_half_inning(&event.description)?;

        let s = &mut self.snapshot;
        s.phase = 6;
        if !s.top_of_inning {
            s.game_start_phase = if s.inning == -1 { 10 } else { s.game_start_phase + 1 };
            s.inning += 1;
        }
        s.top_of_inning = !s.top_of_inning;
        s.half_inning_score = 0.0;

        let side = s.batting_side();
        let (top, inning, team) = (s.top_of_inning, s.inning + 1, s.team_name(side).to_string());
        if parsed.top != top || parsed.inning != inning || parsed.team != team {
            return Err(self.violation(format!(
                "narration announces \"{parsed}\" but the {side} team {team} should bat in {} of {inning}",
                if top { "the top" } else { "the bottom" }
            )));
        }

        self.snapshot.last_update = event.description.clone();
        self.state = MachineState::AwaitBatterUp;
        Ok(())
    }

    fn batter_up(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitBatterUp)?;
        let parsed = rb_parse::parser::parse_batter_up(&event.description)?;

        let side = self.batting_side();
        self.team_mut(side).advance_batter();
        let lineup_batter = self
            .team(side)
            .batter()
            .cloned()
            .ok_or_else(|| self.violation("batting team has no batter"))?;

        if let Some(inhabiting) = &parsed.inhabiting {
            let tag = event
                .player_tags
                .first()
                .ok_or_else(|| self.violation("inhabiting batter without a player tag"))?;
            let haunter = self.roster.player_at(*tag, event.created)?;
            if inhabiting.haunter != haunter.name || inhabiting.haunted != lineup_batter.name {
                return Err(self.violation(format!(
                    "{} inhabiting {} does not match {} inhabiting {}",
                    inhabiting.haunter, inhabiting.haunted, haunter.name, lineup_batter.name
                )));
            }
            self.haunter = Some(haunter);
        }

        let batter = self.current_batter()?;
        let nickname = &self.team(side).nickname;
        if parsed.team != *nickname || parsed.batter != batter.name {
            return Err(self.violation(format!(
                "expected {} batting for the {nickname}, narration has {} batting for the {}",
                batter.name, parsed.batter, parsed.team
            )));
        }
        if let Some(item) = &parsed.wielding
            && batter.legacy_item.as_deref() != Some(item.as_str())
        {
            return Err(self.violation(format!("{} is not wielding {item}", batter.name)));
        }

        self.snapshot.set_batter(side, Some(&batter));
        self.snapshot.last_update = event.description.clone();
        *self.snapshot.team_batter_count_mut(side) += 1;
        self.state = MachineState::AwaitPitch;
        Ok(())
    }

    fn shelled_batter(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitBatterUp)?;
        let side = self.batting_side();
        self.team_mut(side).advance_batter();
        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    fn flavor(&mut self, event: &NarrationEvent, legal: MachineState) -> GameResult<()> {
        self.expect_state(legal)?;
        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    fn inning_end(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitInningEnd)?;
        let expected = format!("Inning {} is now an Outing.", self.snapshot.inning + 1);
        self.expect_text(event, &expected)?;

        self.snapshot.last_update = expected;
        self.snapshot.phase = 2;
        self.state = MachineState::AwaitHalfInningStart;
        Ok(())
    }

    fn game_end(&mut self, event: &NarrationEvent) -> GameResult<()> {
        self.expect_state(MachineState::AwaitGameEnd)?;
        let s = &self.snapshot;
        let away = format!("{} {}", self.away.nickname, format_runs(s.away_score));
        let home = format!("{} {}", self.home.nickname, format_runs(s.home_score));
        let expected = if s.home_score > s.away_score {
            format!("{home}, {away}")
        } else {
            format!("{away}, {home}")
        };
        self.expect_text(event, &expected)?;

        let s = &mut self.snapshot;
        s.last_update = expected;
        s.finalized = true;
        s.game_complete = true;
        self.state = MachineState::Done;
        Ok(())
    }

    /// Incinerations and feedback swaps.
    ///
    /// The first two player tags name the players involved. Whichever of them
    /// is on a team now departs and is replaced by the other, as the roster
    /// knows them shortly after the event.
    fn substitution(&mut self, event: &NarrationEvent) -> GameResult<()> {
        if !self.state.in_progress() {
            return Err(self.violation("substitution outside a game in progress"));
        }
        let [first, second] = match event.player_tags.as_slice() {
            [a, b, ..] => [*a, *b],
            _ => return Err(self.violation("substitution needs two player tags")),
        };

        let this = &*self;
        let plan: Vec<(Side, PlayerId, PlayerId)> = [(first, second), (second, first)]
            .into_iter()
            .flat_map(|(departing, arriving)| {
                [Side::Away, Side::Home]
                    .into_iter()
                    .filter(move |side| on_team(this.team(*side), departing))
                    .map(move |side| (side, departing, arriving))
            })
            .collect();
        if plan.is_empty() {
            return Err(self.violation("no tagged player is on either team"));
        }

        let at = event.created + Duration::seconds(180);
        for (side, departing, arriving) in plan {
            let replacement = self.roster.player_at(arriving, at)?;
            self.team_mut(side).replace_player(departing, &replacement);
            if self.snapshot.pitcher(side) == Some(departing) {
                self.snapshot.set_pitcher(side, Some(&replacement));
            }
            debug!(%side, departing = %departing, arriving = %arriving, "replaced player");
        }

        self.snapshot.last_update = event.description.clone();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    pub(crate) fn team_mut(&mut self, side: Side) -> &mut TeamState {
        match side {
            Side::Away => &mut self.away,
            Side::Home => &mut self.home,
        }
    }

    /// The player at the plate: the haunter when one inhabits the batter.
    pub(crate) fn current_batter(&self) -> GameResult<PlayerState> {
        if let Some(haunter) = &self.haunter {
            return Ok(haunter.clone());
        }
        self.team(self.batting_side())
            .batter()
            .cloned()
            .ok_or_else(|| self.violation("no batter is up"))
    }

    pub(crate) fn fielding_pitcher(&self) -> &PlayerState {
        &self.team(self.snapshot.fielding_side()).pitcher
    }

    pub(crate) fn violation(&self, detail: impl Into<String>) -> GameError {
        GameError::StateViolation {
            state: self.state,
            action: self.action,
            detail: detail.into(),
        }
    }

    pub(crate) fn ensure(&self, condition: bool, detail: impl FnOnce() -> String) -> GameResult<()> {
        if condition { Ok(()) } else { Err(self.violation(detail())) }
    }

    pub(crate) fn expect_state(&self, legal: MachineState) -> GameResult<()> {
        self.ensure(self.state == legal, || format!("only legal in state {legal}"))
    }

    pub(crate) fn expect_text(&self, event: &NarrationEvent, expected: &str) -> GameResult<()> {
        self.ensure(event.description == expected, || {
            format!("expected {expected:?}, narration says {:?}", event.description)
        })
    }
}

fn on_team(team: &TeamState, player: PlayerId) -> bool {
    team.pitcher.id == player || team.lineup().iter().any(|p| p.id == player)
}
