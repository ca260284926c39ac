use std::fmt::{Display, Formatter};

use strum::VariantArray;

use crate::location::{Coord, Location};

/// The two projections of a grid onto lines.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    /// Left to right, indexed top to bottom.
    Row,
    /// Top to bottom, indexed left to right.
    Column,
}

impl Axis {
    /// The axis crossing this one.
    pub fn other(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// Names one row or one column of a grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct LineId {
    /// Whether this is a row or a column.
    pub axis: Axis,
    /// Row index counted from the top, or column index counted from the left.
    pub index: Coord,
}

impl LineId {
    /// The `index`-th row.
    pub fn row(index: Coord) -> Self {
        Self { axis: Axis::Row, index }
    }

    /// The `index`-th column.
    pub fn column(index: Coord) -> Self {
        Self { axis: Axis::Column, index }
    }

    /// The grid location of the cell `position` steps along this line.
    pub fn location(&self, position: Coord) -> Location {
        match self.axis {
            Axis::Row => Location(position, self.index),
            Axis::Column => Location(self.index, position),
        }
    }

    /// The line of the other axis sharing the cell `position` steps along this line.
    pub fn crossing(&self, position: Coord) -> LineId {
        LineId { axis: self.axis.other(), index: position }
    }
}

impl Display for LineId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.axis, self.index)
    }
}
