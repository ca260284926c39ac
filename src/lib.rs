#![warn(missing_docs)]

//! # `hanjie`
//!
//! A solver for [nonograms](https://en.wikipedia.org/wiki/Nonogram), also known as hanjie or griddlers.
//! Describe a puzzle by the run lengths of every row and column, either as a [`Hints`] document or with a
//! [`PuzzleBuilder`], validate it into a [`Puzzle`], then call [`solve`] (or [`Puzzle::solve`]).
//!
//! ```
//! use hanjie::{Hints, SolveResult};
//!
//! let puzzle = Hints::new(vec![vec![1], vec![1]], vec![vec![1], vec![1]]).into_puzzle().unwrap();
//! match puzzle.solve(1, true) {
//!     SolveResult::Solutions(set) => assert_eq!(set.len(), 2),
//!     other => panic!("{other:?}"),
//! }
//! ```
//!
//! # Internals
//! Solving alternates between two layers.
//!
//! The first is line propagation. For a single row or column, the [`line`] module works out exactly which
//! cells are filled in every arrangement of the runs consistent with what is already known, and which are
//! empty in every such arrangement. Those cells are written to the board, which dirties the lines crossing
//! them, and so on until no line yields anything new or some line has no consistent arrangement left.
//!
//! The second is a depth-bounded search. When propagation stalls with unknown cells remaining, one cell is
//! assumed filled and propagation resumes; on a contradiction the assumption is undone and the cell is
//! assumed empty instead. The cell is picked from the line with the fewest unknown cells. `max_depth`
//! bounds how many such assumptions may be nested, so a search can end in three ways besides finding
//! solutions: [`NoSolution`](SolveResult::NoSolution) when the whole tree was explored,
//! [`DepthExhausted`](SolveResult::DepthExhausted) when the bound cut branches off, and
//! [`Cancelled`](SolveResult::Cancelled) when a [`Limits`] was hit. [`deepen`] retries with growing depth.
//!
//! With [`Strategy::Probe`] a node first tries both states of each unknown cell, and when one of them
//! leads propagation into a contradiction the cell takes the other, before it branches at all.
//!
//! The search keeps a single board and an undo trail rather than copying the board per branch, and keeps
//! its branch points on an explicit stack rather than recursing.

pub use axis::{Axis, LineId};
pub use board::{Board, ParseBoardError, Solution};
pub use builder::{BuildError, BuilderInvalidReason, PuzzleBuilder};
pub use cell::Cell;
pub use hints::{Hints, LineHints, LoadError, Run};
pub use limits::{Interruption, Limits};
pub use line::{Contradiction, Line};
pub use location::{Dimension, Location};
pub use puzzle::Puzzle;
pub use solver::{
    deepen, deepen_with, solve, solve_with, SearchStats, SolutionSet, SolveOptions, SolveReport, SolveResult, Strategy,
};

pub(crate) mod axis;
pub(crate) mod board;
pub mod builder;
pub(crate) mod cell;
pub(crate) mod hints;
pub(crate) mod limits;
pub mod line;
pub(crate) mod location;
pub(crate) mod propagate;
pub(crate) mod puzzle;
pub(crate) mod search;
pub(crate) mod solver;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
