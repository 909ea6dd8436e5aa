//! Lattice errors

use thiserror::Error;

/// Errors reported by lattice construction and binding.
///
/// Coordinates never fail: every coordinate-taking operation wraps around
/// the torus.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    #[error("lattice dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("lattice of {width}x{height} cells is too large to index")]
    TooLarge { width: usize, height: usize },

    #[error("{field} seed has {actual} values, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("cannot bind cell ({x}, {y}) to an empty sequence")]
    EmptySequence { x: usize, y: usize },

    #[error("edge slot {0} out of range (expected 0, 1 or 2)")]
    InvalidSlot(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("inconsistent lattice state: {0}")]
    InvalidState(&'static str),
}
