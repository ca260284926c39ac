use std::fmt::{Display, Formatter};

use strum::VariantArray;

/// The knowledge held about one grid cell.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray)]
pub enum Cell {
    /// Not yet deduced.
    #[default]
    Unknown,
    /// Part of a run.
    Filled,
    /// Between or around runs.
    Empty,
}

impl Cell {
    /// The two states a solved cell may take, in the order the search tries them.
    pub const KNOWN: [Cell; 2] = [Cell::Filled, Cell::Empty];

    /// Whether this cell has been decided.
    pub fn is_known(self) -> bool {
        self != Cell::Unknown
    }

    /// Swap [`Filled`](Cell::Filled) and [`Empty`](Cell::Empty); [`Unknown`](Cell::Unknown) stays as is.
    pub fn invert(self) -> Self {
        match self {
            Cell::Filled => Cell::Empty,
            Cell::Empty => Cell::Filled,
            Cell::Unknown => Cell::Unknown,
        }
    }

    #[inline]
    pub(crate) fn can_fill(self) -> bool {
        self != Cell::Empty
    }

    #[inline]
    pub(crate) fn can_empty(self) -> bool {
        self != Cell::Filled
    }

    /// The character used when printing boards.
    pub fn symbol(self) -> char {
        match self {
            Cell::Unknown => '?',
            Cell::Filled => '#',
            Cell::Empty => '.',
        }
    }

    /// Inverse of [`symbol`](Cell::symbol).
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|cell| cell.symbol() == symbol)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
