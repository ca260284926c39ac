use std::fmt::{Display, Formatter};
use std::str::FromStr;

use ndarray::{Array2, ArrayView1, AssignElem};
use serde::{Serialize, Serializer};

use crate::axis::{Axis, LineId};
use crate::cell::Cell;
use crate::hints::runs_of;
use crate::location::{Dimension, Location};
use crate::puzzle::Puzzle;

/// The knowledge held about every cell of a grid.
///
/// Cells are stored once, row-major. Rows and columns are views onto that storage, so a cell
/// changed while working on a row is seen by the column crossing it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    cells: Array2<Cell>,
}

/// Reasons text could not be read as a [`Board`].
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseBoardError {
    /// No rows, or rows without cells.
    #[error("a board needs at least one row and one column")]
    Empty,
    /// Row `row` is not as long as the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character other than `#`, `.` or `?`.
    #[error("unexpected symbol {0:?}")]
    Symbol(char),
}

impl Board {
    pub(crate) fn new(dims: (Dimension, Dimension)) -> Self {
        Self {
            cells: Array2::from_elem((dims.1.get(), dims.0.get()), Cell::Unknown),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// The cell at `location`.
    ///
    /// # Panics
    /// If `location` lies outside the board.
    pub fn get(&self, location: Location) -> Cell {
        self.cells[location.as_index()]
    }

    /// Overwrite the cell at `location`, returning what was there before.
    pub(crate) fn set(&mut self, location: Location, cell: Cell) -> Cell {
        let slot = &mut self.cells[location.as_index()];
        let previous = *slot;
        slot.assign_elem(cell);
        previous
    }

    /// A view of one row or column.
    pub fn line(&self, line: LineId) -> ArrayView1<'_, Cell> {
        match line.axis {
            Axis::Row => self.cells.row(line.index),
            Axis::Column => self.cells.column(line.index),
        }
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Cell>> {
        self.cells.rows().into_iter()
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// How many cells are still [`Unknown`](Cell::Unknown).
    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_known()).count()
    }

    /// Whether every cell is known.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_known())
    }

    /// Whether this board is complete and the runs of every row and column are exactly the hints of `puzzle`.
    pub fn satisfies(&self, puzzle: &Puzzle) -> bool {
        (self.width(), self.height()) == (puzzle.width(), puzzle.height())
            && self.is_complete()
            && puzzle.lines().all(|line| runs_of(self.line(line).iter()) == puzzle.hints(line))
    }

    /// One string per row, using [`Cell::symbol`].
    pub fn to_row_strings(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.to_row_strings() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Read the [`Display`] form back: one line of symbols per row; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(|c| Cell::from_symbol(c).ok_or(ParseBoardError::Symbol(c))).collect())
            .collect::<Result<Vec<Vec<Cell>>, _>>()?;

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(ParseBoardError::Empty);
        }
        if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != width) {
            return Err(ParseBoardError::Ragged { row, expected: width, found });
        }

        let height = rows.len();
        let cells = Array2::from_shape_vec((height, width), rows.into_iter().flatten().collect())
            .map_err(|_| ParseBoardError::Empty)?;
        Ok(Self { cells })
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_row_strings())
    }
}

/// A fully determined board whose runs match every hint of the puzzle it solves.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct Solution(Board);

impl Solution {
    pub(crate) fn new(board: Board) -> Self {
        debug_assert!(board.is_complete());
        Self(board)
    }

    /// The solved board.
    pub fn board(&self) -> &Board {
        &self.0
    }

    /// The solved cells in row-major order; none are [`Unknown`](Cell::Unknown).
    pub fn to_cells(&self) -> Vec<Cell> {
        self.0.cells().collect()
    }

    /// Whether `location` is filled.
    pub fn is_filled(&self, location: Location) -> bool {
        self.0.get(location) == Cell::Filled
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
