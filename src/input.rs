//! Driver input queue - interactions buffered between frames
//!
//! A render loop records pointer and keyboard actions as [`InputEvent`]s as
//! they arrive, then hands the whole batch to the lattice once per frame.
//! The lattice is never touched from inside an event callback.

use std::collections::VecDeque;

use crate::error::LatticeError;
use crate::lattice::Lattice;
use crate::topology::Slot;

/// A single interaction, already translated into lattice coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Flip a cell to `1 - value`.
    Toggle { x: i64, y: i64 },
    /// Overwrite a cell's activation.
    Set { x: i64, y: i64, value: f32 },
    /// Overwrite the three weights a cell owns, in [`Slot::ALL`] order.
    SetWeights { x: i64, y: i64, weights: [f32; 3] },
    /// Drive a cell from a sample sequence.
    Bind { x: i64, y: i64, samples: Vec<f32> },
    /// Release a driven cell.
    Unbind { x: i64, y: i64 },
    /// Advance the simulation one tick.
    Step,
}

/// What a drained batch did to the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Cell, weight and binding edits applied.
    pub edits: usize,
    /// Steps taken.
    pub steps: usize,
}

impl FrameReport {
    /// True if the lattice's arrays may have changed.
    pub fn changed(&self) -> bool {
        self.edits > 0 || self.steps > 0
    }
}

/// FIFO of pending interactions.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pending events, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Apply every pending event to `lattice` in arrival order.
    ///
    /// On error the failing event is dropped and later events stay queued;
    /// everything before it has already been applied.
    pub fn drain_into(&mut self, lattice: &mut Lattice) -> Result<FrameReport, LatticeError> {
        let mut report = FrameReport::default();
        while let Some(event) = self.events.pop_front() {
            match event {
                InputEvent::Toggle { x, y } => {
                    let v = lattice.toggle(x, y);
                    log::debug!("[INPUT] toggle ({}, {}) -> {}", x, y, v);
                    report.edits += 1;
                }
                InputEvent::Set { x, y, value } => {
                    lattice.set(x, y, value);
                    report.edits += 1;
                }
                InputEvent::SetWeights { x, y, weights } => {
                    for (slot, w) in Slot::ALL.into_iter().zip(weights) {
                        lattice.set_weight(x, y, slot, w);
                    }
                    report.edits += 1;
                }
                InputEvent::Bind { x, y, samples } => {
                    lattice.bind(x, y, samples)?;
                    report.edits += 1;
                }
                InputEvent::Unbind { x, y } => {
                    if lattice.unbind(x, y) {
                        report.edits += 1;
                    }
                }
                InputEvent::Step => {
                    lattice.step();
                    report.steps += 1;
                }
            }
        }
        Ok(report)
    }
}

impl Extend<InputEvent> for InputQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}
