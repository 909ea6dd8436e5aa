//! External bindings - cells driven by an outside sample sequence

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::LatticeError;

/// A cell whose activation is overridden after every step by the next
/// sample of a round-robin sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BindingState"))]
pub struct Binding {
    x: usize,
    y: usize,
    samples: Vec<f32>,
    cursor: usize,
}

impl Binding {
    /// Create a binding for the wrapped cell `(x, y)`.
    ///
    /// `samples[0]` is considered consumed (the lattice writes it at bind
    /// time), so the cursor starts at the second sample. Returns `None` for
    /// an empty sequence.
    pub(crate) fn new(x: usize, y: usize, samples: Vec<f32>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let cursor = 1 % samples.len();
        Some(Self {
            x,
            y,
            samples,
            cursor,
        })
    }

    /// Bound cell column.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Bound cell row.
    pub fn y(&self) -> usize {
        self.y
    }

    /// The full sample sequence.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// The first sample, written at bind time.
    pub(crate) fn first(&self) -> f32 {
        self.samples[0]
    }

    /// Sample the next step will write.
    pub fn peek(&self) -> f32 {
        self.samples[self.cursor]
    }

    /// Take the next sample and advance the cursor, wrapping to the start.
    pub(crate) fn advance(&mut self) -> f32 {
        let v = self.samples[self.cursor];
        self.cursor += 1;
        if self.cursor >= self.samples.len() {
            self.cursor = 0;
        }
        v
    }
}

/// Serialized form of a [`Binding`], checked before use.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct BindingState {
    x: usize,
    y: usize,
    samples: Vec<f32>,
    cursor: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<BindingState> for Binding {
    type Error = LatticeError;

    fn try_from(state: BindingState) -> Result<Self, Self::Error> {
        if state.samples.is_empty() {
            return Err(LatticeError::EmptySequence {
                x: state.x,
                y: state.y,
            });
        }
        if state.cursor >= state.samples.len() {
            return Err(LatticeError::InvalidState("binding cursor past end of samples"));
        }
        Ok(Self {
            x: state.x,
            y: state.y,
            samples: state.samples,
            cursor: state.cursor,
        })
    }
}

/// Ordered set of bindings, at most one per cell.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, replacing any existing binding for the same cell in
    /// place. Returns `true` if an existing binding was replaced.
    pub(crate) fn insert(&mut self, binding: Binding) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|b| b.x == binding.x && b.y == binding.y)
        {
            Some(existing) => {
                *existing = binding;
                true
            }
            None => {
                self.entries.push(binding);
                false
            }
        }
    }

    /// Remove the binding for a cell, keeping the order of the rest.
    pub(crate) fn remove(&mut self, x: usize, y: usize) -> Option<Binding> {
        let pos = self.entries.iter().position(|b| b.x == x && b.y == y)?;
        Some(self.entries.remove(pos))
    }

    /// Binding for the canonical cell `(x, y)`, if any.
    pub fn get(&self, x: usize, y: usize) -> Option<&Binding> {
        self.entries.iter().find(|b| b.x == x && b.y == y)
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Binding> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(Binding::new(0, 0, Vec::new()).is_none());
    }

    #[test]
    fn test_round_robin_after_first() {
        let mut b = Binding::new(1, 2, vec![0.1, 0.2, 0.3]).unwrap();
        assert_eq!(b.first(), 0.1);
        assert_eq!(b.advance(), 0.2);
        assert_eq!(b.advance(), 0.3);
        assert_eq!(b.advance(), 0.1);
        assert_eq!(b.peek(), 0.2);
    }

    #[test]
    fn test_single_sample_repeats() {
        let mut b = Binding::new(0, 0, vec![0.9]).unwrap();
        assert_eq!(b.advance(), 0.9);
        assert_eq!(b.advance(), 0.9);
    }

    #[test]
    fn test_rebind_replaces_in_place() {
        let mut set = Bindings::new();
        assert!(!set.insert(Binding::new(0, 0, vec![1.0]).unwrap()));
        assert!(!set.insert(Binding::new(1, 0, vec![2.0]).unwrap()));
        assert!(!set.insert(Binding::new(2, 0, vec![3.0]).unwrap()));
        assert!(set.insert(Binding::new(0, 0, vec![4.0, 5.0]).unwrap()));

        assert_eq!(set.len(), 3);
        let order: Vec<_> = set.iter().map(|b| (b.x(), b.samples()[0])).collect();
        assert_eq!(order, vec![(0, 4.0), (1, 2.0), (2, 3.0)]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut set = Bindings::new();
        for x in 0..3 {
            set.insert(Binding::new(x, 0, vec![x as f32]).unwrap());
        }
        assert!(set.remove(1, 0).is_some());
        assert!(set.remove(1, 0).is_none());
        let xs: Vec<_> = set.iter().map(Binding::x).collect();
        assert_eq!(xs, vec![0, 2]);
    }
}
