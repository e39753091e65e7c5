use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Which symbol is ours and which belongs to the remote opponent.
/// Chosen once per game and fixed until reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIdentity {
    player: Mark,
    opponent: Mark,
}

impl PlayerIdentity {
    pub const fn new(player: Mark) -> Self {
        Self {
            player,
            opponent: player.opposite(),
        }
    }

    pub const fn player(self) -> Mark {
        self.player
    }

    pub const fn opponent(self) -> Mark {
        self.opponent
    }
}

/// Client-local stage of the game, derived from snapshots. Never
/// authoritative: the peer's text is the only source of truth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Setup,
    AwaitingPlayerMove,
    AwaitingOpponentMove,
    GameOver,
}

impl Phase {
    pub const fn is_setup(self) -> bool {
        matches!(self, Self::Setup)
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }

    pub const fn accepts_board_input(self) -> bool {
        matches!(self, Self::AwaitingPlayerMove)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Setup
    }
}

/// What the caller must do after a successful [`Session::start`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartEffect {
    /// We are X and move first; wait for a cell click.
    AwaitPlayer,
    /// The opponent moves first; the caller schedules an automatic
    /// opponent-move request after its fixed delay.
    AwaitOpponent,
}

/// Verdict on a cell click. Rejections are silent by contract: no error
/// reaches the user and nothing goes on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    SendMove(Coord2),
}

/// What a parsed snapshot did to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Board and/or phase refreshed; play continues.
    Updated,
    /// Terminal text detected; the caller schedules the end-of-game modal.
    Finished(Outcome),
}

/// The whole client-side game state, mutated only through its transition
/// methods. The render layer reads it and reacts to the returned effects;
/// it holds no game state of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    phase: Phase,
    outcome: Outcome,
    identity: Option<PlayerIdentity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn identity(&self) -> Option<PlayerIdentity> {
        self.identity
    }

    pub fn started(&self) -> bool {
        !self.phase.is_setup()
    }

    /// Begins a game with the chosen symbol. X always moves first, so
    /// choosing O hands the first move to the opponent.
    pub fn start(&mut self, mark: Mark) -> StartEffect {
        self.board.clear();
        self.outcome = Outcome::InProgress;
        self.identity = Some(PlayerIdentity::new(mark));

        if mark == Mark::X {
            self.phase = Phase::AwaitingPlayerMove;
            StartEffect::AwaitPlayer
        } else {
            self.phase = Phase::AwaitingOpponentMove;
            StartEffect::AwaitOpponent
        }
    }

    /// Gates a cell click. The board is never mutated here: an accepted
    /// click only produces an outbound move request, and the cell fills in
    /// when the peer's snapshot echoes back.
    pub fn click(&self, coords: Coord2) -> ClickOutcome {
        use ClickOutcome::*;

        if !self.phase.accepts_board_input() {
            return Ignored;
        }
        let Ok(coords) = Board::validate_coords(coords) else {
            return Ignored;
        };
        if !self.board.is_empty_at(coords) {
            return Ignored;
        }

        SendMove(coords)
    }

    /// Feeds one snapshot through the parser and folds its signal into the
    /// phase.
    pub fn apply_snapshot(&mut self, text: &str) -> SnapshotOutcome {
        use SnapshotSignal::*;

        match crate::snapshot::apply_snapshot(&mut self.board, text, self.identity) {
            Finished(outcome) => {
                if let Some(outcome) = outcome {
                    self.outcome = outcome;
                }
                self.phase = Phase::GameOver;
                SnapshotOutcome::Finished(self.outcome)
            }
            PlayerTurn => {
                self.phase = Phase::AwaitingPlayerMove;
                SnapshotOutcome::Updated
            }
            OpponentTurn => {
                self.phase = Phase::AwaitingOpponentMove;
                SnapshotOutcome::Updated
            }
            NoChange => SnapshotOutcome::Updated,
        }
    }

    /// Re-initializes the board for a fresh game while a reply to
    /// `start_game`/`reset_game` is applied. Unlike [`Session::reset`] the
    /// identity is kept, since the reply belongs to the game being started.
    pub fn fresh_board(&mut self) {
        self.board.clear();
        self.outcome = Outcome::InProgress;
        if self.phase.is_game_over() {
            self.phase = match self.identity {
                Some(identity) if identity.player() == Mark::O => Phase::AwaitingOpponentMove,
                Some(_) => Phase::AwaitingPlayerMove,
                None => Phase::Setup,
            };
        }
    }

    /// Returns to setup. The transcript (held elsewhere) is deliberately
    /// untouched by reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cells carrying the winning mark, for the best-effort endgame
    /// highlight. Not the exact winning line: the peer never tells us one.
    pub fn winning_cells(&self) -> Vec<Coord2> {
        let Some(winner) = self.outcome.winner() else {
            return Vec::new();
        };

        self.board
            .iter_cells()
            .filter(|&(_, cell)| cell.mark() == Some(winner))
            .map(|(coords, _)| coords)
            .collect()
    }

    /// Default status line for the current phase. Replies carrying a
    /// `status` field override this until the next parse.
    pub fn status_line(&self) -> String {
        match self.phase {
            Phase::Setup => String::from("Choose your symbol and start a new game."),
            Phase::AwaitingPlayerMove => match self.identity {
                Some(identity) => format!("Your turn ({})", identity.player()),
                None => String::from("Your turn"),
            },
            Phase::AwaitingOpponentMove => String::from("Opponent is thinking..."),
            Phase::GameOver => String::from("Game Over!"),
        }
    }
}
