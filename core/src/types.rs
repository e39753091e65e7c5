use core::fmt;
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board rows and columns.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Cells per side of the board.
pub const SIDE: Coord = 3;

/// A player's mark. The peer only ever deals in these two symbols.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub const fn opposite(self) -> Self {
        use Mark::*;
        match self {
            X => O,
            O => X,
        }
    }

    pub const fn as_str(self) -> &'static str {
        use Mark::*;
        match self {
            X => "X",
            O => "O",
        }
    }

    /// Parses a trimmed snapshot cell token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "X" => Some(Self::X),
            "O" => Some(Self::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The peer's verdict on the game, taken verbatim from its snapshots and
/// never recomputed locally.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub const fn winner(self) -> Option<Mark> {
        match self {
            Self::Win(mark) => Some(mark),
            _ => None,
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_marks_pair_up() {
        assert_eq!(Mark::X.opposite(), Mark::O);
        assert_eq!(Mark::O.opposite(), Mark::X);
    }

    #[test]
    fn mark_tokens_parse_only_known_symbols() {
        assert_eq!(Mark::from_token("X"), Some(Mark::X));
        assert_eq!(Mark::from_token("O"), Some(Mark::O));
        assert_eq!(Mark::from_token(""), None);
        assert_eq!(Mark::from_token("Z"), None);
    }

    #[test]
    fn marks_serialize_as_bare_symbols() {
        assert_eq!(serde_json::to_string(&Mark::X).unwrap(), "\"X\"");
        assert_eq!(serde_json::from_str::<Mark>("\"O\"").unwrap(), Mark::O);
    }

    #[test]
    fn outcome_finished_excludes_in_progress() {
        assert!(!Outcome::InProgress.is_finished());
        assert!(Outcome::Win(Mark::X).is_finished());
        assert!(Outcome::Draw.is_finished());
        assert_eq!(Outcome::Draw.winner(), None);
        assert_eq!(Outcome::Win(Mark::O).winner(), Some(Mark::O));
    }
}
