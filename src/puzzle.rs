use std::io;
use std::num::NonZero;

use strum::VariantArray;

use crate::axis::{Axis, LineId};
use crate::board::Board;
use crate::builder::{BuildError, BuilderInvalidReason, PuzzleBuilder};
use crate::hints::{Hints, LineHints, LoadError, Run};
use crate::line::Line;
use crate::location::Dimension;
use crate::solver::{self, SolveResult};

/// A validated nonogram: the hints of every row and column of a `width` × `height` grid.
///
/// Every line is known to hold its runs, so the only way a [`Puzzle`] can fail to solve is through
/// the interaction of rows and columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Puzzle {
    dims: (Dimension, Dimension),
    row_hints: Vec<LineHints>,
    col_hints: Vec<LineHints>,
}

impl Puzzle {
    pub(crate) fn new(dims: (Dimension, Dimension), row_hints: Vec<LineHints>, col_hints: Vec<LineHints>) -> Self {
        Self { dims, row_hints, col_hints }
    }

    /// Validate a hint document, taking the dimensions from the number of row and column hints.
    pub fn from_hints(hints: Hints) -> Result<Self, BuildError> {
        let width = NonZero::new(hints.col_hints.len());
        let height = NonZero::new(hints.row_hints.len());
        let (Some(width), Some(height)) = (width, height) else {
            let reasons = [(Axis::Row, height.is_none()), (Axis::Column, width.is_none())]
                .into_iter()
                .filter(|(_, empty)| *empty)
                .map(|(axis, _)| BuilderInvalidReason::EmptyAxis { axis })
                .collect();
            return Err(BuildError { reasons });
        };

        let mut builder = PuzzleBuilder::with_dims((width, height));
        for row in hints.row_hints {
            builder.add_row(row);
        }
        for column in hints.col_hints {
            builder.add_column(column);
        }
        builder.build()
    }

    /// Read and validate a JSON hint document.
    pub fn load<R: io::Read>(rdr: R) -> Result<Self, LoadError> {
        Ok(Hints::from_reader(rdr)?.into_puzzle()?)
    }

    /// Parse and validate a JSON hint document.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(Hints::from_json_str(json)?.into_puzzle()?)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.dims.0.get()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dims.1.get()
    }

    /// `(width, height)`
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// Total number of cells, which is also a search depth that always suffices.
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Number of lines along `axis`.
    pub fn line_count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.height(),
            Axis::Column => self.width(),
        }
    }

    /// Number of cells in every line along `axis`.
    pub fn line_length(&self, axis: Axis) -> usize {
        self.line_count(axis.other())
    }

    /// Every row, top to bottom, then every column, left to right.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        Axis::VARIANTS
            .iter()
            .flat_map(move |&axis| (0..self.line_count(axis)).map(move |index| LineId { axis, index }))
    }

    /// The runs of `line`.
    pub fn hints(&self, line: LineId) -> &[Run] {
        match line.axis {
            Axis::Row => &self.row_hints[line.index],
            Axis::Column => &self.col_hints[line.index],
        }
    }

    /// A board of the right size with nothing deduced yet.
    pub fn new_board(&self) -> Board {
        Board::new(self.dims)
    }

    /// The constrained line `id` as currently seen on `board`.
    pub fn line<'a>(&'a self, board: &'a Board, id: LineId) -> Line<'a> {
        Line::new(id, self.hints(id), board.line(id))
    }

    /// The hint document this puzzle was built from.
    pub fn to_hints(&self) -> Hints {
        Hints::new(self.row_hints.clone(), self.col_hints.clone())
    }

    /// Shorthand for [`solver::solve`].
    pub fn solve(&self, max_depth: usize, find_all: bool) -> SolveResult {
        solver::solve(self, max_depth, find_all)
    }
}
