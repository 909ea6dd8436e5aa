//! Hexagonal torus topology - wraparound and the shared contact table
//!
//! Every cell touches six neighbors but stores only three edge weights
//! (its *owned* slots). The other three are read from the neighbor that
//! owns them, so each undirected edge has exactly one weight.
//!
//! ```text
//!   (-1,+1)  (0,+1)
//!        \    |
//! (-1,0) -- (x,y) -- (+1,0)
//!             |    \
//!          (0,-1)  (+1,-1)
//! ```

use crate::error::LatticeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three edge weights a cell owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Slot {
    /// Edge to `(x-1, y+1)`.
    West = 0,
    /// Edge to `(x, y+1)`.
    North = 1,
    /// Edge to `(x+1, y)`.
    East = 2,
}

impl Slot {
    /// All owned slots in storage order.
    pub const ALL: [Slot; 3] = [Slot::West, Slot::North, Slot::East];

    /// Position of this slot inside a cell's weight triple.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Offset of the neighbor this slot connects to.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        let c = &CONTACTS[self.index()];
        (c.dx, c.dy)
    }
}

impl TryFrom<usize> for Slot {
    type Error = LatticeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Slot::ALL
            .get(value)
            .copied()
            .ok_or(LatticeError::InvalidSlot(value))
    }
}

/// A directed neighbor relation and the weight it reads.
///
/// The neighbor is at `(x+dx, y+dy)`; its weight is stored at slot `slot`
/// of cell `(x+owner_dx, y+owner_dy)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub dx: i64,
    pub dy: i64,
    pub owner_dx: i64,
    pub owner_dy: i64,
    pub slot: Slot,
}

const fn contact(dx: i64, dy: i64, owner_dx: i64, owner_dy: i64, slot: Slot) -> Contact {
    Contact {
        dx,
        dy,
        owner_dx,
        owner_dy,
        slot,
    }
}

/// The six contacts of a cell. Entries `0..3` are the owned slots in
/// [`Slot::ALL`] order; entry `5 - i` reads slot `i` back from the neighbor
/// that owns it.
pub const CONTACTS: [Contact; 6] = [
    contact(-1, 1, 0, 0, Slot::West),
    contact(0, 1, 0, 0, Slot::North),
    contact(1, 0, 0, 0, Slot::East),
    contact(-1, 0, -1, 0, Slot::East),
    contact(0, -1, 0, -1, Slot::North),
    contact(1, -1, 1, -1, Slot::West),
];

/// Toroidal wrap of one coordinate into `0..n`.
#[inline]
pub fn wrap(c: i64, n: usize) -> usize {
    c.rem_euclid(n as i64) as usize
}

/// Row-major indexing over a `width x height` torus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Torus {
    pub width: usize,
    pub height: usize,
}

impl Torus {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Wrap a coordinate pair onto the torus.
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> (usize, usize) {
        (wrap(x, self.width), wrap(y, self.height))
    }

    /// Cell index of a (possibly out of range) coordinate.
    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> usize {
        let (x, y) = self.wrap(x, y);
        y * self.width + x
    }

    /// Weight index of slot `slot` owned by cell `(x, y)`.
    #[inline]
    pub fn edge(&self, x: i64, y: i64, slot: Slot) -> usize {
        self.cell(x, y) * 3 + slot.index()
    }

    /// Cell index of the neighbor reached through `contact`.
    #[inline]
    pub fn neighbor(&self, x: i64, y: i64, contact: &Contact) -> usize {
        self.cell(x + contact.dx, y + contact.dy)
    }

    /// Weight index read by `contact` from cell `(x, y)`.
    #[inline]
    pub fn contact_edge(&self, x: i64, y: i64, contact: &Contact) -> usize {
        self.edge(x + contact.owner_dx, y + contact.owner_dy, contact.slot)
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}
