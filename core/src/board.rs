use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

/// One cell of the grid. A marked cell never reverts to empty except
/// through an explicit [`Board::clear`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn mark(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::Marked(mark) => Some(mark),
        }
    }
}

/// The local mirror of the peer's 3×3 board, indexed by `(row, col)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; SIDE as usize]; SIDE as usize],
}

impl Board {
    pub fn validate_coords(coords: Coord2) -> Result<Coord2> {
        if coords.0 < SIDE && coords.1 < SIDE {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn is_empty_at(&self, coords: Coord2) -> bool {
        self[coords].is_empty()
    }

    pub fn is_all_empty(&self) -> bool {
        self.iter_cells().all(|(_, cell)| cell.is_empty())
    }

    /// Returns the board to all-empty. The only path by which a marked
    /// cell becomes empty again.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        (0..SIDE).flat_map(move |row| (0..SIDE).map(move |col| ((row, col), self[(row, col)])))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[row as usize][col as usize]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, (row, col): Coord2) -> &mut Self::Output {
        &mut self.cells[row as usize][col as usize]
    }
}
