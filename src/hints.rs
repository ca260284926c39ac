use std::fs::File;
use std::io;
use std::path::Path;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::builder::BuildError;
use crate::cell::Cell;
use crate::puzzle::Puzzle;

/// The length of one run of consecutive filled cells.
pub type Run = usize;
/// The runs of one line, left to right for rows and top to bottom for columns.
pub type LineHints = Vec<Run>;

/// Hints as exchanged with the outside world:
///
/// ```json
/// { "row_hints": [[1, 1], [3]], "col_hints": [[2], [1], [2]] }
/// ```
///
/// An empty inner list describes a line with no filled cells.
/// Nothing here is validated; convert into a [`Puzzle`] with [`Hints::into_puzzle`] first.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hints {
    /// One entry per row, top to bottom.
    pub row_hints: Vec<LineHints>,
    /// One entry per column, left to right.
    pub col_hints: Vec<LineHints>,
}

/// Reasons hints could not be turned into a [`Puzzle`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document is not the JSON shape shown on [`Hints`]; negative run lengths end up here too.
    #[error("malformed hints: {0}")]
    Json(#[from] serde_json::Error),
    /// The hint file could not be opened.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The hints parsed but describe no valid puzzle.
    #[error(transparent)]
    Invalid(#[from] BuildError),
}

impl Hints {
    /// Hints for a grid of `row_hints.len()` rows and `col_hints.len()` columns.
    pub fn new(row_hints: Vec<LineHints>, col_hints: Vec<LineHints>) -> Self {
        Self { row_hints, col_hints }
    }

    /// Parse the JSON hint document from `rdr`.
    pub fn from_reader<R: io::Read>(rdr: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(rdr)?)
    }

    /// Parse the JSON hint document held in `json`.
    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the JSON hint document stored at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(io::BufReader::new(File::open(path)?))
    }

    /// Validate these hints. See [`PuzzleBuilder`](crate::builder::PuzzleBuilder) for what is checked.
    pub fn into_puzzle(self) -> Result<Puzzle, BuildError> {
        Puzzle::from_hints(self)
    }

    /// The hints describing a fully determined grid, given as rows of cells.
    ///
    /// There is one column per cell of the longest row. Rows shorter than that contribute nothing
    /// to the columns they do not reach.
    pub fn of_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Self {
        let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        Self {
            row_hints: rows.iter().map(|row| runs_of(row.as_ref())).collect(),
            col_hints: (0..width)
                .map(|x| runs_of(rows.iter().filter_map(|row| row.as_ref().get(x))))
                .collect(),
        }
    }
}

/// The run lengths of the filled cells in `cells`. [`Unknown`](Cell::Unknown) cells break runs.
pub fn runs_of<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> LineHints {
    let groups = cells.into_iter().chunk_by(|cell| **cell);
    let runs = groups
        .into_iter()
        .filter(|(cell, _)| *cell == Cell::Filled)
        .map(|(_, run)| run.count())
        .collect();
    runs
}

/// The shortest line that can hold `hints`, with one gap between consecutive runs, or `None` if
/// that length does not fit in a `usize`.
pub fn min_length(hints: &[Run]) -> Option<usize> {
    let cells = hints.iter().try_fold(0usize, |total, run| total.checked_add(*run))?;
    cells.checked_add(hints.len().saturating_sub(1))
}
