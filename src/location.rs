use std::num::NonZero;

use crate::axis::{Axis, LineId};

pub(crate) type Coord = usize;
/// A width or height of a grid. Grids always have at least one row and one column.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(x, y)` on a board. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// The line along `axis` which passes through this location.
    pub fn line(&self, axis: Axis) -> LineId {
        match axis {
            Axis::Row => LineId::row(self.1),
            Axis::Column => LineId::column(self.0),
        }
    }

    /// How far along a line of `axis` this location sits.
    pub(crate) fn position(&self, axis: Axis) -> Coord {
        match axis {
            Axis::Row => self.0,
            Axis::Column => self.1,
        }
    }
}
