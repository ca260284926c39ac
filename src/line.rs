//! Deductions within a single row or column.
//!
//! Placing the runs of a line is a walk over `(run, position)` states: at every position the next
//! cell is either skipped (left empty) or starts the next run, which then also claims the gap after
//! it. Whether a state can be reached from the left end and whether the right end can be reached
//! from it are both computed in one pass each, so the full set of arrangements never needs to be
//! listed. A placement of run `j` at `s` exists in some arrangement exactly when the state before it
//! is reachable from the left and the state after it reaches the right.

use std::ops::Range;

use log::trace;
use ndarray::ArrayView1;

use crate::axis::LineId;
use crate::cell::Cell;
use crate::hints::Run;

/// No arrangement of the runs agrees with the cells already known.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("no arrangement of the hints agrees with the known cells")]
pub struct Contradiction;

/// Where one run can lie across all arrangements consistent with a line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BlockRange {
    /// Length of the run.
    pub len: Run,
    /// Leftmost start over all consistent arrangements.
    pub earliest_start: usize,
    /// Rightmost start over all consistent arrangements.
    pub latest_start: usize,
}

impl BlockRange {
    /// Cells covered by this run in every arrangement: the overlap of its leftmost and rightmost placements.
    pub fn definite(&self) -> Range<usize> {
        self.latest_start..(self.earliest_start + self.len).max(self.latest_start)
    }

    /// Cells covered by this run in at least one arrangement.
    pub fn possible(&self) -> Range<usize> {
        self.earliest_start..self.latest_start + self.len
    }
}

/// For every cell of a line, whether some consistent arrangement fills it and whether some leaves it empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Possibilities {
    can_fill: Vec<bool>,
    can_empty: Vec<bool>,
    blocks: Vec<BlockRange>,
}

impl Possibilities {
    /// Whether some arrangement fills `position`.
    pub fn can_fill(&self, position: usize) -> bool {
        self.can_fill[position]
    }

    /// Whether some arrangement leaves `position` empty.
    pub fn can_empty(&self, position: usize) -> bool {
        self.can_empty[position]
    }

    /// The state every arrangement agrees on at `position`, or [`Unknown`](Cell::Unknown) when they differ.
    pub fn forced(&self, position: usize) -> Cell {
        match (self.can_fill[position], self.can_empty[position]) {
            (true, false) => Cell::Filled,
            (false, true) => Cell::Empty,
            _ => Cell::Unknown,
        }
    }

    /// The range of each run, in hint order.
    pub fn blocks(&self) -> &[BlockRange] {
        &self.blocks
    }

    /// Number of cells in the line.
    pub fn len(&self) -> usize {
        self.can_fill.len()
    }

    /// Whether the line has no cells.
    pub fn is_empty(&self) -> bool {
        self.can_fill.is_empty()
    }
}

/// Cells a line solve upgraded from [`Unknown`](Cell::Unknown), as `(position, state)`.
pub type Changes = Vec<(usize, Cell)>;

/// Counts of filled and empty cells before each position, for constant-time range checks.
struct Tally {
    filled: Vec<usize>,
    empty: Vec<usize>,
}

impl Tally {
    fn new(cells: &[Cell]) -> Self {
        let mut filled = Vec::with_capacity(cells.len() + 1);
        let mut empty = Vec::with_capacity(cells.len() + 1);
        filled.push(0);
        empty.push(0);
        for cell in cells {
            filled.push(filled.last().copied().unwrap_or(0) + usize::from(*cell == Cell::Filled));
            empty.push(empty.last().copied().unwrap_or(0) + usize::from(*cell == Cell::Empty));
        }
        Self { filled, empty }
    }

    #[inline]
    fn all_fillable(&self, range: Range<usize>) -> bool {
        self.empty[range.end] == self.empty[range.start]
    }

    #[inline]
    fn all_emptiable(&self, range: Range<usize>) -> bool {
        self.filled[range.end] == self.filled[range.start]
    }
}

/// Compute the [`Possibilities`] of a line of `cells.len()` cells holding `hints`.
pub fn summarize(hints: &[Run], cells: &[Cell]) -> Result<Possibilities, Contradiction> {
    let length = cells.len();
    let runs = hints.len();
    let tally = Tally::new(cells);

    // state after placing run `j` at `start`, including the gap behind it, or None if it cannot go there
    let after = |j: usize, start: usize| -> Option<usize> {
        let end = start.checked_add(hints[j]).filter(|end| *end <= length)?;
        if !tally.all_fillable(start..end) {
            None
        } else if end == length {
            Some(length)
        } else if cells[end].can_empty() {
            Some(end + 1)
        } else {
            None
        }
    };

    // forward[j][p]: runs ..j fit in cells ..p
    let mut forward = vec![vec![false; length + 1]; runs + 1];
    forward[0][0] = true;
    for p in 0..=length {
        for j in 0..=runs {
            if !forward[j][p] {
                continue;
            }
            if p < length && cells[p].can_empty() {
                forward[j][p + 1] = true;
            }
            if j < runs {
                if let Some(next) = after(j, p) {
                    forward[j + 1][next] = true;
                }
            }
        }
    }

    if !forward[runs][length] {
        return Err(Contradiction);
    }

    // backward[j][p]: runs j.. fit in cells p..
    let mut backward = vec![vec![false; length + 1]; runs + 1];
    for p in (0..=length).rev() {
        backward[runs][p] = tally.all_emptiable(p..length);
        for j in (0..runs).rev() {
            let skip = p < length && cells[p].can_empty() && backward[j][p + 1];
            backward[j][p] = skip || after(j, p).is_some_and(|next| backward[j + 1][next]);
        }
    }

    let mut fill_cover = vec![0isize; length + 1];
    let mut can_empty = vec![false; length];
    let mut blocks = Vec::with_capacity(runs);

    for (j, &len) in hints.iter().enumerate() {
        let mut earliest = None;
        let mut latest = 0;
        for start in 0..length {
            if !forward[j][start] {
                continue;
            }
            let Some(next) = after(j, start).filter(|next| backward[j + 1][*next]) else {
                continue;
            };
            earliest.get_or_insert(start);
            latest = start;
            fill_cover[start] += 1;
            fill_cover[start + len] -= 1;
            if next > start + len {
                can_empty[start + len] = true;
            }
        }
        // the line is feasible, so every run has at least one placement
        let earliest_start = earliest.ok_or(Contradiction)?;
        blocks.push(BlockRange { len, earliest_start, latest_start: latest });
    }

    for (p, slot) in can_empty.iter_mut().enumerate() {
        if !*slot && cells[p].can_empty() {
            *slot = (0..=runs).any(|j| forward[j][p] && backward[j][p + 1]);
        }
    }

    let mut covered = 0;
    let can_fill = fill_cover[..length]
        .iter()
        .map(|delta| {
            covered += delta;
            covered > 0
        })
        .collect();

    Ok(Possibilities { can_fill, can_empty, blocks })
}

/// Upgrade every [`Unknown`](Cell::Unknown) cell whose state all consistent arrangements agree on.
///
/// Known cells are never changed. The returned changes are in ascending position order.
pub fn solve_line(hints: &[Run], cells: &[Cell]) -> Result<Changes, Contradiction> {
    let possibilities = summarize(hints, cells)?;
    Ok(cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.is_known())
        .filter_map(|(position, _)| match possibilities.forced(position) {
            Cell::Unknown => None,
            forced => Some((position, forced)),
        })
        .collect())
}

/// One row or column: its hints and a view of the cells it covers.
#[derive(Clone, Debug)]
pub struct Line<'a> {
    id: LineId,
    hints: &'a [Run],
    cells: ArrayView1<'a, Cell>,
}

impl<'a> Line<'a> {
    /// Pair `hints` with the `cells` of line `id`.
    pub fn new(id: LineId, hints: &'a [Run], cells: ArrayView1<'a, Cell>) -> Self {
        Self { id, hints, cells }
    }

    /// Which line this is.
    pub fn id(&self) -> LineId {
        self.id
    }

    /// The runs this line must hold.
    pub fn hints(&self) -> &'a [Run] {
        self.hints
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the line has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The current state of the covered cells.
    pub fn cells(&self) -> ArrayView1<'a, Cell> {
        self.cells.clone()
    }

    /// How many covered cells are not yet known.
    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_known()).count()
    }

    fn with_cells<T>(&self, f: impl FnOnce(&[Cell]) -> T) -> T {
        // rows are contiguous, columns are strided
        match self.cells.as_slice() {
            Some(cells) => f(cells),
            None => f(&self.cells.to_vec()),
        }
    }

    /// See [`summarize`].
    pub fn summarize(&self) -> Result<Possibilities, Contradiction> {
        self.with_cells(|cells| summarize(self.hints, cells))
    }

    /// See [`solve_line`].
    pub fn solve(&self) -> Result<Changes, Contradiction> {
        let changes = self.with_cells(|cells| solve_line(self.hints, cells));
        match &changes {
            Ok(changes) if !changes.is_empty() => trace!("{}: {} cells forced", self.id, changes.len()),
            Ok(_) => {}
            Err(_) => trace!("{}: no arrangement fits", self.id),
        }
        changes
    }
}
