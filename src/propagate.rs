use std::collections::{HashMap, VecDeque};

use strum::VariantArray;

use crate::axis::{Axis, LineId};
use crate::board::Board;
use crate::cell::Cell;
use crate::line::{Changes, Contradiction};
use crate::location::Location;
use crate::puzzle::Puzzle;

/// Entries kept per line before its cache is emptied.
const LINE_CACHE_CAPACITY: usize = 1 << 12;

/// Remembered outcomes of solving one line, keyed by the cells it held at the time.
type LineCache = HashMap<Vec<Cell>, Result<Changes, Contradiction>, ahash::RandomState>;

/// Assignments made since the search started, each with the state it replaced.
#[derive(Clone, Debug, Default)]
pub(crate) struct Trail {
    entries: Vec<(Location, Cell)>,
}

impl Trail {
    /// A mark to [`undo_to`](Self::undo_to) later.
    pub(crate) fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn assign(&mut self, board: &mut Board, location: Location, cell: Cell) {
        let previous = board.set(location, cell);
        self.entries.push((location, previous));
    }

    /// Revert every assignment made after `checkpoint`, newest first.
    pub(crate) fn undo_to(&mut self, board: &mut Board, checkpoint: usize) {
        while self.entries.len() > checkpoint {
            if let Some((location, previous)) = self.entries.pop() {
                board.set(location, previous);
            }
        }
    }
}

/// Runs the line solver over dirty lines until nothing changes or a line contradicts itself.
///
/// A line is dirty when one of its cells changed since it was last solved. Solving a line only
/// dirties the lines crossing the cells it changed, never itself, because a line solve already
/// leaves nothing further to deduce from that line alone.
pub(crate) struct Propagator<'p> {
    puzzle: &'p Puzzle,
    queue: VecDeque<LineId>,
    queued: [Vec<bool>; 2],
    caches: [Vec<LineCache>; 2],
    cache_capacity: usize,
    line_solves: u64,
}

#[inline]
fn slot(axis: Axis) -> usize {
    match axis {
        Axis::Row => 0,
        Axis::Column => 1,
    }
}

impl<'p> Propagator<'p> {
    pub(crate) fn new(puzzle: &'p Puzzle) -> Self {
        Self::with_cache_capacity(puzzle, LINE_CACHE_CAPACITY)
    }

    /// A propagator whose per-line caches are emptied whenever they reach `cache_capacity` entries.
    pub(crate) fn with_cache_capacity(puzzle: &'p Puzzle, cache_capacity: usize) -> Self {
        let per_axis = |axis: Axis| puzzle.line_count(axis);
        Self {
            puzzle,
            queue: VecDeque::with_capacity(puzzle.lines().count()),
            queued: [vec![false; per_axis(Axis::Row)], vec![false; per_axis(Axis::Column)]],
            caches: [
                (0..per_axis(Axis::Row)).map(|_| LineCache::default()).collect(),
                (0..per_axis(Axis::Column)).map(|_| LineCache::default()).collect(),
            ],
            cache_capacity,
            line_solves: 0,
        }
    }

    /// How many times a line was solved, cached or not.
    pub(crate) fn line_solves(&self) -> u64 {
        self.line_solves
    }

    fn enqueue(&mut self, line: LineId) {
        let flag = &mut self.queued[slot(line.axis)][line.index];
        if !*flag {
            *flag = true;
            self.queue.push_back(line);
        }
    }

    fn clear(&mut self) {
        self.queue.clear();
        for flags in self.queued.iter_mut() {
            flags.iter_mut().for_each(|flag| *flag = false);
        }
    }

    /// Solve every line, then propagate to a fixed point. Returns how many cells were assigned.
    pub(crate) fn propagate_all(&mut self, board: &mut Board, trail: &mut Trail) -> Result<usize, Contradiction> {
        for axis in Axis::VARIANTS {
            for index in 0..self.puzzle.line_count(*axis) {
                self.enqueue(LineId { axis: *axis, index });
            }
        }
        self.run(board, trail)
    }

    /// Assign `cell` at `location`, then propagate from the two lines through it.
    /// The assignment itself is counted among the returned assignments.
    pub(crate) fn assume(
        &mut self,
        board: &mut Board,
        trail: &mut Trail,
        location: Location,
        cell: Cell,
    ) -> Result<usize, Contradiction> {
        trail.assign(board, location, cell);
        for axis in Axis::VARIANTS {
            self.enqueue(location.line(*axis));
        }
        self.run(board, trail).map(|assigned| assigned + 1)
    }

    fn run(&mut self, board: &mut Board, trail: &mut Trail) -> Result<usize, Contradiction> {
        let mut assigned = 0;
        while let Some(line) = self.queue.pop_front() {
            self.queued[slot(line.axis)][line.index] = false;

            let changes = match self.solve_line(board, line) {
                Ok(changes) => changes,
                Err(contradiction) => {
                    self.clear();
                    return Err(contradiction);
                }
            };

            for (position, cell) in changes {
                trail.assign(board, line.location(position), cell);
                self.enqueue(line.crossing(position));
                assigned += 1;
            }
        }
        Ok(assigned)
    }

    fn solve_line(&mut self, board: &Board, id: LineId) -> Result<Changes, Contradiction> {
        self.line_solves += 1;
        let puzzle = self.puzzle;
        let line = puzzle.line(board, id);
        let key = line.cells().to_vec();
        let cache = &mut self.caches[slot(id.axis)][id.index];
        if let Some(outcome) = cache.get(&key) {
            return outcome.clone();
        }

        let outcome = line.solve();
        if cache.len() >= self.cache_capacity {
            cache.clear();
        }
        cache.insert(key, outcome.clone());
        outcome
    }
}
