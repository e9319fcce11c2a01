use std::fmt;

/// Where the reconstructor is in a game.
///
/// Exactly one state is active; every action kind is legal in a fixed set of
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineState {
    /// Before "Let's Go!".
    AwaitStart,
    /// Before "Play ball!".
    AwaitPlayBall,
    /// Between half-innings.
    AwaitHalfInningStart,
    /// Waiting for the next batter.
    AwaitBatterUp,
    /// A batter is up.
    AwaitPitch,
    /// After the bottom half, before the inning-end narration.
    AwaitInningEnd,
    /// The last out has been made, waiting for the final score.
    AwaitGameEnd,
    /// The game is over.
    Done,
}

impl MachineState {
    /// Whether the game has started and not yet finished.
    pub fn in_progress(self) -> bool {
        !matches!(self, MachineState::AwaitStart | MachineState::Done)
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MachineState::AwaitStart => "await-start",
            MachineState::AwaitPlayBall => "await-play-ball",
            MachineState::AwaitHalfInningStart => "await-half-inning-start",
            MachineState::AwaitBatterUp => "await-batter-up",
            MachineState::AwaitPitch => "await-pitch",
            MachineState::AwaitInningEnd => "await-inning-end",
            MachineState::AwaitGameEnd => "await-game-end",
            MachineState::Done => "done",
        };
        write!(f, "{name}")
    }
}
