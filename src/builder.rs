//! Validation of hint lists into a [`Puzzle`](crate::Puzzle).

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::axis::{Axis, LineId};
use crate::hints::{min_length, LineHints};
use crate::location::Dimension;
use crate::puzzle::Puzzle;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// Hints describe a grid with no rows or no columns.
    EmptyAxis {
        /// The axis without any lines.
        axis: Axis,
    },
    /// A run of length zero was given. Lines without runs are written as empty hint lists instead.
    ZeroRun {
        /// The line holding the zero.
        line: LineId,
    },
    /// The runs of a line do not fit in it even when packed with single gaps.
    LineOverflow {
        /// The line which cannot hold its runs.
        line: LineId,
        /// Cells needed to pack the runs.
        required: usize,
        /// Cells available.
        length: usize,
    },
    /// More lines were added along an axis than the dimensions of the builder allow.
    ExtraLine {
        /// The axis that overflowed.
        axis: Axis,
    },
    /// Fewer lines were added along an axis than the dimensions of the builder call for.
    MissingLines {
        /// The axis that is short.
        axis: Axis,
        /// Lines called for by the dimensions.
        expected: usize,
        /// Lines actually added.
        found: usize,
    },
}

impl Display for BuilderInvalidReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAxis { axis } => write!(f, "the grid has no {axis}s"),
            Self::ZeroRun { line } => write!(f, "{line} has a run of length 0"),
            Self::LineOverflow { line, required, length } => {
                write!(f, "{line} needs at least {required} cells but is {length} long")
            }
            Self::ExtraLine { axis } => write!(f, "too many {axis} hints"),
            Self::MissingLines { axis, expected, found } => {
                write!(f, "expected {expected} {axis} hints, found {found}")
            }
        }
    }
}

/// The hints could not be built into a [`Puzzle`]. Every problem found is listed.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid puzzle: {}", .reasons.iter().join("; "))]
pub struct BuildError {
    /// What went wrong, in the order it was found.
    pub reasons: Vec<BuilderInvalidReason>,
}

/// Collects the hints of a puzzle line by line.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Unlike a bare [`Hints`](crate::Hints) document, every line is checked as it is added,
/// so a line which can never be satisfied is reported before any solving starts.
#[derive(Clone, Debug)]
pub struct PuzzleBuilder {
    // width, height
    dims: (Dimension, Dimension),
    rows: Vec<LineHints>,
    columns: Vec<LineHints>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl PuzzleBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(width, height)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            rows: Vec::with_capacity(dims.1.get()),
            columns: Vec::with_capacity(dims.0.get()),
            invalid_reasons: Default::default(),
        }
    }

    /// Add the hints of the next row, counting from the top.
    ///
    /// May cause the builder to enter an invalid state if the row has a zero run, cannot hold its runs, or is one row too many.
    /// Problems accumulate; a builder which is already invalid keeps checking further lines.
    pub fn add_row(&mut self, hints: impl Into<LineHints>) -> &mut Self {
        self.add_line(Axis::Row, hints.into())
    }

    /// Add the hints of the next column, counting from the left. Checked as in [`Self::add_row`].
    pub fn add_column(&mut self, hints: impl Into<LineHints>) -> &mut Self {
        self.add_line(Axis::Column, hints.into())
    }

    fn add_line(&mut self, axis: Axis, hints: LineHints) -> &mut Self {
        let (width, height) = (self.dims.0.get(), self.dims.1.get());
        let (lines, count, length) = match axis {
            Axis::Row => (&mut self.rows, height, width),
            Axis::Column => (&mut self.columns, width, height),
        };

        let line = LineId { axis, index: lines.len() };
        if line.index >= count {
            self.invalid_reasons.push(BuilderInvalidReason::ExtraLine { axis });
            return self;
        }

        let required = min_length(&hints).unwrap_or(usize::MAX);
        if hints.contains(&0) {
            self.invalid_reasons.push(BuilderInvalidReason::ZeroRun { line });
        } else if required > length {
            self.invalid_reasons.push(BuilderInvalidReason::LineOverflow { line, required, length });
        }

        lines.push(hints);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid so far, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    /// Lines not yet added are only reported by [`Self::build`].
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Puzzle`].
    /// If the builder is invalid for any reason, the [`BuildError`] lists why.
    pub fn build(&self) -> Result<Puzzle, BuildError> {
        let mut reasons = self.invalid_reasons.clone();
        for (axis, lines, expected) in [
            (Axis::Row, &self.rows, self.dims.1.get()),
            (Axis::Column, &self.columns, self.dims.0.get()),
        ] {
            if lines.len() < expected {
                reasons.push(BuilderInvalidReason::MissingLines { axis, expected, found: lines.len() });
            }
        }

        if !reasons.is_empty() {
            return Err(BuildError { reasons });
        }

        Ok(Puzzle::new(self.dims, self.rows.clone(), self.columns.clone()))
    }
}
