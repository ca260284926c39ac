use std::collections::HashSet;

use log::info;
use serde::Serialize;

use crate::board::{Board, Solution};
use crate::limits::{Interruption, Limits};
use crate::puzzle::Puzzle;
use crate::search::Search;

/// What a search node does once line propagation stalls.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Nothing: stop at the line propagation fixed point, whatever the depth budget.
    Lines,
    /// Branch on a cell.
    #[default]
    Branch,
    /// Try both states of every unknown cell first. A state whose propagation contradicts forces
    /// the other, and the sweep repeats until it forces nothing. Then branch on what is left.
    Probe,
}

/// How a single search is run.
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    /// Most nested branching decisions allowed on one search path; `0` means propagation only.
    pub max_depth: usize,
    /// Keep searching after the first solution to find every solution within `max_depth`.
    pub find_all: bool,
    /// When to give up early.
    pub limits: Limits,
    /// Deductions tried before branching.
    pub strategy: Strategy,
}

impl SolveOptions {
    /// Options without limits.
    pub fn new(max_depth: usize, find_all: bool) -> Self {
        Self { max_depth, find_all, limits: Limits::default(), strategy: Strategy::default() }
    }

    /// Replace the strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the limits.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Counters describing the work a search did.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SearchStats {
    /// Propagation passes, one per search node.
    pub nodes: u64,
    /// Deepest branching depth reached.
    pub deepest: usize,
    /// Nodes left unexpanded because the depth budget was spent.
    pub depth_cutoffs: u64,
    /// Nodes abandoned because a line had no consistent arrangement.
    pub contradictions: u64,
    /// Line solver invocations, including those answered from the cache.
    pub line_solves: u64,
    /// Cell states tried by [`Strategy::Probe`].
    pub probes: u64,
}

impl SearchStats {
    fn absorb(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.deepest = self.deepest.max(other.deepest);
        self.depth_cutoffs += other.depth_cutoffs;
        self.contradictions += other.contradictions;
        self.line_solves += other.line_solves;
        self.probes += other.probes;
    }
}

/// Distinct solutions, in the order they were found.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SolutionSet {
    solutions: Vec<Solution>,
    exhaustive: bool,
}

impl SolutionSet {
    /// The solutions.
    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    /// The first solution found.
    pub fn first(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    /// Number of solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Always false; a set is only reported when something was found.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Whether these are all the solutions the puzzle has.
    ///
    /// Only a search asked to find all solutions which never hit its depth budget can know this.
    pub fn is_exhaustive(&self) -> bool {
        self.exhaustive
    }

    /// Take the solutions.
    pub fn into_vec(self) -> Vec<Solution> {
        self.solutions
    }
}

/// The outcome of a search.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveResult {
    /// At least one solution was found.
    Solutions(SolutionSet),
    /// The whole search tree was explored without a depth cut-off and nothing satisfies the hints.
    /// No larger depth can help.
    NoSolution,
    /// Nothing was found, but some branches were cut off by the depth budget; a larger depth may succeed.
    DepthExhausted {
        /// What propagation deduced before any branching.
        partial: Board,
    },
    /// The search stopped early because of its [`Limits`]. This says nothing about solvability.
    Cancelled {
        /// Which limit was hit.
        reason: Interruption,
        /// Solutions found before stopping.
        solutions: Vec<Solution>,
    },
}

impl SolveResult {
    /// Whether any solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveResult::Solutions(_))
    }

    /// Solutions found, if any; partial results of a cancelled search included.
    pub fn solutions(&self) -> &[Solution] {
        match self {
            SolveResult::Solutions(set) => set.solutions(),
            SolveResult::Cancelled { solutions, .. } => solutions,
            SolveResult::NoSolution | SolveResult::DepthExhausted { .. } => &[],
        }
    }
}

/// A [`SolveResult`] with the counters of the search that produced it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolveReport {
    /// The outcome.
    pub result: SolveResult,
    /// Work done.
    pub stats: SearchStats,
}

/// Records complete boards found by the search, ignoring repeats.
pub(crate) struct SolutionCollector<'p> {
    puzzle: &'p Puzzle,
    seen: HashSet<Board, ahash::RandomState>,
    solutions: Vec<Solution>,
}

impl<'p> SolutionCollector<'p> {
    pub(crate) fn new(puzzle: &'p Puzzle) -> Self {
        Self { puzzle, seen: HashSet::default(), solutions: Vec::new() }
    }

    /// Keep a copy of `board`, returning whether it was new.
    pub(crate) fn record(&mut self, board: &Board) -> bool {
        debug_assert!(board.satisfies(self.puzzle), "propagation completed an invalid board:\n{board}");

        if !self.seen.insert(board.clone()) {
            return false;
        }
        info!("solution {} found", self.solutions.len() + 1);
        self.solutions.push(Solution::new(board.clone()));
        true
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub(crate) fn into_set(self, exhaustive: bool) -> SolutionSet {
        SolutionSet { solutions: self.solutions, exhaustive }
    }

    pub(crate) fn into_solutions(self) -> Vec<Solution> {
        self.solutions
    }
}

/// Search `puzzle` with at most `max_depth` nested branching decisions.
///
/// With `find_all` false the search stops at the first solution. Each call starts from scratch.
pub fn solve(puzzle: &Puzzle, max_depth: usize, find_all: bool) -> SolveResult {
    solve_with(puzzle, &SolveOptions::new(max_depth, find_all)).result
}

/// [`solve`], with limits and counters.
pub fn solve_with(puzzle: &Puzzle, options: &SolveOptions) -> SolveReport {
    Search::new(puzzle, options).run()
}

/// Search with max depth `0`, `1`, `2`, ... up to `ceiling` and report the first conclusive result.
///
/// A result is conclusive when it holds solutions (all of them, when `find_all` is set and the
/// depth allows proving it) or proves there is none. The default ceiling is the number of cells,
/// which is always enough. The limits apply to each depth separately, except for the deadline and
/// stop flag which are shared. Counters are summed over all depths tried.
pub fn deepen(puzzle: &Puzzle, ceiling: Option<usize>, find_all: bool, limits: &Limits) -> SolveReport {
    let options = SolveOptions::new(0, find_all).with_limits(limits.clone());
    deepen_with(puzzle, ceiling, &options)
}

/// [`deepen`] with a [`Strategy`]. The `max_depth` of `options` is ignored.
///
/// [`Strategy::Lines`] never branches, so it is tried at depth `0` only.
pub fn deepen_with(puzzle: &Puzzle, ceiling: Option<usize>, options: &SolveOptions) -> SolveReport {
    let ceiling = match options.strategy {
        Strategy::Lines => 0,
        Strategy::Branch | Strategy::Probe => ceiling.unwrap_or_else(|| puzzle.cell_count()),
    };
    let mut total = SearchStats::default();
    let mut depth = 0;
    loop {
        info!("searching with max depth {depth}");
        let options = SolveOptions { max_depth: depth, ..options.clone() };
        let SolveReport { result, stats } = solve_with(puzzle, &options);
        total.absorb(&stats);

        let retry = depth < ceiling
            && match &result {
                SolveResult::DepthExhausted { .. } => true,
                SolveResult::Solutions(set) => options.find_all && !set.is_exhaustive(),
                SolveResult::NoSolution | SolveResult::Cancelled { .. } => false,
            };
        if !retry {
            return SolveReport { result, stats: total };
        }
        depth += 1;
    }
}
