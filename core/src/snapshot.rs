//! Parsing of the peer's textual board snapshots.
//!
//! The peer reports state as semi-structured text: board rows joined with
//! pipes, then metadata lines such as `Current player: X` and
//! `Game state: x_wins`. This module is the single place that knows the
//! convention; should the wire format ever grow structured fields, only
//! [`apply_snapshot`] has to change.
//!
//! The convention is reproduced exactly as the peer emits it, fragility
//! included: any line containing `|` is a board row, only the first three
//! such lines are consulted, and terminal/turn detection is a substring
//! match over the whole text. A snapshot with fewer than three pipe lines
//! leaves the remaining rows untouched.

use alloc::format;
use alloc::string::String;

use crate::*;

/// Turn/terminal signal carried by a snapshot's metadata lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapshotSignal {
    /// Terminal text found. `None` means the text signalled game over
    /// without one of the three known verdict markers; the prior outcome
    /// stands.
    Finished(Option<Outcome>),
    PlayerTurn,
    OpponentTurn,
    /// Neither terminal nor turn text matched; the phase stays as-is.
    NoChange,
}

/// Overwrites `board` with the rows parsed out of `text` and returns the
/// detected signal. Rows and cells the text does not cover keep their
/// previous contents.
pub fn apply_snapshot(
    board: &mut Board,
    text: &str,
    identity: Option<PlayerIdentity>,
) -> SnapshotSignal {
    apply_board_rows(board, text);
    detect_signal(text, identity)
}

fn apply_board_rows(board: &mut Board, text: &str) {
    let rows = text
        .lines()
        .filter(|line| line.contains('|'))
        .take(SIDE as usize);

    for (row, line) in rows.enumerate() {
        for (col, token) in line.split('|').take(SIDE as usize).enumerate() {
            let token = token.trim();
            let coords = (row as Coord, col as Coord);

            if token.is_empty() {
                board[coords] = Cell::Empty;
            } else if let Some(mark) = Mark::from_token(token) {
                board[coords] = Cell::Marked(mark);
            } else {
                // Not a mark the data model knows; leave the cell as-is.
                log::debug!("ignoring unknown cell token {:?} at {:?}", token, coords);
            }
        }
    }
}

/// Terminal markers take precedence over turn markers; turn detection
/// needs an identity to know which symbol is whose and is skipped before
/// one is chosen.
fn detect_signal(text: &str, identity: Option<PlayerIdentity>) -> SnapshotSignal {
    use SnapshotSignal::*;

    if text.contains("wins") || text.contains("draw") {
        return Finished(if text.contains("x_wins") {
            Some(Outcome::Win(Mark::X))
        } else if text.contains("o_wins") {
            Some(Outcome::Win(Mark::O))
        } else if text.contains("draw") {
            Some(Outcome::Draw)
        } else {
            None
        });
    }

    let Some(identity) = identity else {
        return NoChange;
    };

    if text.contains(current_player_line(identity.opponent()).as_str()) {
        OpponentTurn
    } else if text.contains(current_player_line(identity.player()).as_str()) {
        PlayerTurn
    } else {
        NoChange
    }
}

fn current_player_line(mark: Mark) -> String {
    format!("Current player: {}", mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    fn identity(player: Mark) -> Option<PlayerIdentity> {
        Some(PlayerIdentity::new(player))
    }

    /// Serializes a board the way the peer does, for round-trip checks.
    fn to_snapshot_text(board: &Board, trailer: &str) -> String {
        let mut lines = Vec::new();
        for row in 0..SIDE {
            let cells: Vec<&str> = (0..SIDE)
                .map(|col| board[(row, col)].mark().map_or(" ", Mark::as_str))
                .collect();
            lines.push(cells.join(" | "));
            lines.push("-".repeat(9));
        }
        lines.pop();
        lines.push(trailer.to_string());
        lines.join("\n")
    }

    #[test]
    fn parses_marks_and_empties_from_pipe_rows() {
        let text = " X | O |  \n   |X  |  \n   |   |O \nCurrent player: X";
        let mut board = Board::default();

        let signal = apply_snapshot(&mut board, text, identity(Mark::X));

        assert_eq!(signal, SnapshotSignal::PlayerTurn);
        assert_eq!(board[(0, 0)], Cell::Marked(Mark::X));
        assert_eq!(board[(0, 1)], Cell::Marked(Mark::O));
        assert_eq!(board[(0, 2)], Cell::Empty);
        assert_eq!(board[(1, 1)], Cell::Marked(Mark::X));
        assert_eq!(board[(2, 2)], Cell::Marked(Mark::O));
        assert!(board.is_empty_at((1, 0)));
        assert!(board.is_empty_at((2, 0)));
    }

    #[test]
    fn round_trips_a_full_board() {
        let mut board = Board::default();
        board[(0, 0)] = Cell::Marked(Mark::X);
        board[(1, 1)] = Cell::Marked(Mark::O);
        board[(2, 0)] = Cell::Marked(Mark::X);

        let text = to_snapshot_text(&board, "Current player: O");
        let mut parsed = Board::default();
        apply_snapshot(&mut parsed, &text, identity(Mark::X));

        assert_eq!(parsed, board);
    }

    #[test]
    fn x_wins_takes_precedence_regardless_of_board() {
        let text = "O | O | O\nGame state: x_wins";
        let mut board = Board::default();

        let signal = apply_snapshot(&mut board, text, identity(Mark::O));

        assert_eq!(signal, SnapshotSignal::Finished(Some(Outcome::Win(Mark::X))));
    }

    #[test]
    fn o_wins_and_draw_markers_are_detected() {
        let mut board = Board::default();

        assert_eq!(
            apply_snapshot(&mut board, "Game state: o_wins", identity(Mark::X)),
            SnapshotSignal::Finished(Some(Outcome::Win(Mark::O)))
        );
        assert_eq!(
            apply_snapshot(&mut board, "Game state: draw", identity(Mark::X)),
            SnapshotSignal::Finished(Some(Outcome::Draw))
        );
    }

    #[test]
    fn terminal_text_beats_turn_text() {
        let text = "Current player: X\nGame state: draw";

        let mut board = Board::default();
        let signal = apply_snapshot(&mut board, text, identity(Mark::X));

        assert_eq!(signal, SnapshotSignal::Finished(Some(Outcome::Draw)));
    }

    #[test]
    fn bare_wins_marker_finishes_without_a_verdict() {
        let mut board = Board::default();

        let signal = apply_snapshot(&mut board, "somebody wins", identity(Mark::X));

        assert_eq!(signal, SnapshotSignal::Finished(None));
    }

    #[test]
    fn opponent_turn_is_checked_before_player_turn() {
        let mut board = Board::default();

        let signal = apply_snapshot(&mut board, "Current player: O", identity(Mark::X));

        assert_eq!(signal, SnapshotSignal::OpponentTurn);
    }

    #[test]
    fn unmatched_text_changes_nothing() {
        let mut board = Board::default();
        board[(1, 1)] = Cell::Marked(Mark::X);
        let before = board;

        let signal = apply_snapshot(&mut board, "Move successful", identity(Mark::X));

        assert_eq!(signal, SnapshotSignal::NoChange);
        assert_eq!(board, before);
    }

    #[test]
    fn short_snapshot_leaves_trailing_rows_untouched() {
        let mut board = Board::default();
        board[(2, 2)] = Cell::Marked(Mark::O);

        // Only one pipe row: rows 1 and 2 must keep their prior contents.
        apply_snapshot(&mut board, "X |   |  ", identity(Mark::X));

        assert_eq!(board[(0, 0)], Cell::Marked(Mark::X));
        assert_eq!(board[(2, 2)], Cell::Marked(Mark::O));
    }

    #[test]
    fn turn_detection_without_identity_is_a_no_op() {
        let mut board = Board::default();

        let signal = apply_snapshot(&mut board, "Current player: X", None);

        assert_eq!(signal, SnapshotSignal::NoChange);
    }

    #[test]
    fn unknown_cell_tokens_keep_prior_contents() {
        let mut board = Board::default();
        board[(0, 0)] = Cell::Marked(Mark::X);

        apply_snapshot(&mut board, "? | O |  ", identity(Mark::X));

        assert_eq!(board[(0, 0)], Cell::Marked(Mark::X));
        assert_eq!(board[(0, 1)], Cell::Marked(Mark::O));
    }
}
