use itertools::Itertools;
use log::debug;

use crate::board::Board;
use crate::cell::Cell;
use crate::limits::Interruption;
use crate::line::Contradiction;
use crate::location::Location;
use crate::propagate::{Propagator, Trail};
use crate::puzzle::Puzzle;
use crate::solver::{SearchStats, SolutionCollector, SolveOptions, SolveReport, SolveResult, Strategy};

#[derive(Clone, Copy, Debug)]
struct Assumption {
    location: Location,
    cell: Cell,
}

#[derive(Debug)]
enum State {
    /// Propagate to a fixed point, after first assuming a cell if one is given.
    Propagating { depth: usize, assumption: Option<Assumption> },
    /// Propagation stalled with unknown cells left.
    Branching { depth: usize },
    /// The board is complete.
    Found,
    /// Contradiction or depth budget spent; resume at the nearest untried alternative.
    Failed,
}

/// A branch point still on the current search path.
#[derive(Debug)]
struct Frame {
    // trail length before the first alternative was assumed
    checkpoint: usize,
    location: Location,
    alternative: Option<Cell>,
    depth: usize,
}

/// Depth-first branch-and-bound over one board, driven by an explicit frame stack.
///
/// Sibling branches never see each other's assignments: before an alternative is tried the trail
/// is unwound to the checkpoint its frame recorded.
pub(crate) struct Search<'p> {
    puzzle: &'p Puzzle,
    options: &'p SolveOptions,
    board: Board,
    trail: Trail,
    propagator: Propagator<'p>,
    frames: Vec<Frame>,
    collector: SolutionCollector<'p>,
    // the board after propagation at the root, before any branching
    partial: Option<Board>,
    stats: SearchStats,
}

impl<'p> Search<'p> {
    pub(crate) fn new(puzzle: &'p Puzzle, options: &'p SolveOptions) -> Self {
        Self {
            puzzle,
            options,
            board: puzzle.new_board(),
            trail: Trail::default(),
            propagator: Propagator::new(puzzle),
            frames: Vec::new(),
            collector: SolutionCollector::new(puzzle),
            partial: None,
            stats: SearchStats::default(),
        }
    }

    pub(crate) fn run(mut self) -> SolveReport {
        let mut state = State::Propagating { depth: 0, assumption: None };
        loop {
            state = match state {
                State::Propagating { depth, assumption } => {
                    if let Some(reason) = self.options.limits.exceeded(self.stats.nodes) {
                        return self.interrupt(reason);
                    }
                    self.stats.nodes += 1;
                    self.stats.deepest = self.stats.deepest.max(depth);
                    self.propagate(depth, assumption)
                }
                State::Branching { depth } => {
                    if let Some(reason) = self.options.limits.exceeded(self.stats.nodes) {
                        return self.interrupt(reason);
                    }
                    self.branch(depth)
                }
                State::Found => {
                    if self.collector.record(&self.board) && !self.options.find_all {
                        return self.finish();
                    }
                    State::Failed
                }
                State::Failed => match self.backtrack() {
                    Some(next) => next,
                    None => return self.finish(),
                },
            };
        }
    }

    fn propagate(&mut self, depth: usize, assumption: Option<Assumption>) -> State {
        let mut outcome = match assumption {
            None => self.propagator.propagate_all(&mut self.board, &mut self.trail),
            Some(Assumption { location, cell }) => {
                self.propagator.assume(&mut self.board, &mut self.trail, location, cell)
            }
        };
        if self.options.strategy == Strategy::Probe && outcome.is_ok() {
            outcome = self.probe();
        }

        match outcome {
            Err(Contradiction) => {
                self.stats.contradictions += 1;
                State::Failed
            }
            Ok(_) => {
                if assumption.is_none() {
                    self.partial = Some(self.board.clone());
                }
                if self.board.is_complete() {
                    State::Found
                } else {
                    State::Branching { depth }
                }
            }
        }
    }

    /// Try each state of every unknown cell. A state whose propagation contradicts forces the
    /// other; sweeps repeat until one forces nothing. Returns how many cells were forced.
    fn probe(&mut self) -> Result<usize, Contradiction> {
        let mut forced = 0;
        loop {
            let unknown: Vec<Location> = (0..self.board.height())
                .cartesian_product(0..self.board.width())
                .map(|(y, x)| Location(x, y))
                .filter(|location| !self.board.get(*location).is_known())
                .collect();

            let before = forced;
            for location in unknown {
                // an earlier probe in this sweep may have decided it
                if self.board.get(location).is_known() {
                    continue;
                }
                for cell in Cell::KNOWN {
                    self.stats.probes += 1;
                    let checkpoint = self.trail.checkpoint();
                    let outcome = self.propagator.assume(&mut self.board, &mut self.trail, location, cell);
                    self.trail.undo_to(&mut self.board, checkpoint);
                    if outcome.is_err() {
                        debug!("probing {cell:?} at {location:?} contradicts");
                        forced += self.propagator.assume(&mut self.board, &mut self.trail, location, cell.invert())?;
                        break;
                    }
                }
            }

            if forced == before {
                return Ok(forced);
            }
        }
    }

    fn branch(&mut self, depth: usize) -> State {
        if self.options.strategy == Strategy::Lines || depth >= self.options.max_depth {
            self.stats.depth_cutoffs += 1;
            return State::Failed;
        }

        // nothing left to branch on means nothing is unknown
        let Some(location) = self.branch_cell() else {
            return State::Found;
        };

        let [first, second] = Cell::KNOWN;
        debug!("depth {depth}: assuming {first:?} at {location:?}");
        self.frames.push(Frame {
            checkpoint: self.trail.checkpoint(),
            location,
            alternative: Some(second),
            depth,
        });
        State::Propagating {
            depth: depth + 1,
            assumption: Some(Assumption { location, cell: first }),
        }
    }

    /// The first unknown cell of the line with the fewest unknown cells.
    fn branch_cell(&self) -> Option<Location> {
        let (line, _) = self
            .puzzle
            .lines()
            .map(|id| (id, self.puzzle.line(&self.board, id).unknown_count()))
            .filter(|(_, unknown)| *unknown > 0)
            .min_by_key(|(_, unknown)| *unknown)?;

        self.board
            .line(line)
            .iter()
            .position(|cell| !cell.is_known())
            .map(|position| line.location(position))
    }

    fn backtrack(&mut self) -> Option<State> {
        while let Some(frame) = self.frames.last_mut() {
            self.trail.undo_to(&mut self.board, frame.checkpoint);
            if let Some(cell) = frame.alternative.take() {
                debug!("depth {}: backtracking to {cell:?} at {:?}", frame.depth, frame.location);
                return Some(State::Propagating {
                    depth: frame.depth + 1,
                    assumption: Some(Assumption { location: frame.location, cell }),
                });
            }
            self.frames.pop();
        }
        None
    }

    fn finish(mut self) -> SolveReport {
        self.stats.line_solves = self.propagator.line_solves();
        let result = if !self.collector.is_empty() {
            let exhaustive = self.options.find_all && self.stats.depth_cutoffs == 0;
            SolveResult::Solutions(self.collector.into_set(exhaustive))
        } else if self.stats.depth_cutoffs > 0 {
            SolveResult::DepthExhausted {
                partial: self.partial.unwrap_or_else(|| self.puzzle.new_board()),
            }
        } else {
            SolveResult::NoSolution
        };
        debug!("search finished after {} nodes", self.stats.nodes);
        SolveReport { result, stats: self.stats }
    }

    fn interrupt(mut self, reason: Interruption) -> SolveReport {
        debug!("search interrupted ({reason}) after {} nodes", self.stats.nodes);
        self.stats.line_solves = self.propagator.line_solves();
        SolveReport {
            result: SolveResult::Cancelled { reason, solutions: self.collector.into_solutions() },
            stats: self.stats,
        }
    }
}
