//! HexGrid Lattice - toroidal hexagonal threshold network with Hebbian edges
//!
//! Cells fire, decay, and teach their edges. Nothing else.
//!
//! # Core Types
//!
//! - **Lattice**: activation, threshold and weight fields on a hex torus
//! - **LatticeConfig**: dimensions and the learning-rule factors
//! - **Seeding**: random, uniform or caller-supplied initial state
//! - **InputQueue**: interactions buffered by a driver between frames
//!
//! # Model
//!
//! Every cell has six neighbors but owns only three edge weights (west,
//! north, east). The other three are read from the neighbor that owns them,
//! so each undirected edge is stored once. All coordinates wrap around.
//!
//! One [`Lattice::step`]:
//!
//! 1. Each cell gates its weighted neighbor sum against its own threshold.
//!    A hot cell (activation above 0.20) decays by 0.75 instead, and raises
//!    its threshold if its neighbors would have fired it anyway.
//! 2. Bound cells are overwritten with the next sample of their sequence.
//! 3. Edges whose endpoints are both hot strengthen (clamped to 1.0); all
//!    other edges decay.
//!
//! # Example
//!
//! ```rust
//! use hexgrid_lattice::{InputEvent, InputQueue, Lattice};
//!
//! // 3x3 torus, silent cells, thresholds 0.5, weights 0.5
//! let mut lattice = Lattice::uniform(3, 3, 0.0, 0.5, 0.5).unwrap();
//!
//! // A driver records clicks and key presses as they happen...
//! let mut input = InputQueue::new();
//! input.push(InputEvent::Toggle { x: 1, y: 1 });
//! input.push(InputEvent::Step);
//!
//! // ...and applies them once per frame.
//! let report = input.drain_into(&mut lattice).unwrap();
//! assert_eq!(report.steps, 1);
//!
//! // Every neighbor of the toggled cell crossed its threshold.
//! assert_eq!(lattice.get(2, 1), 1.0);
//! assert_eq!(lattice.get(1, 1), 0.75);
//!
//! // Flat arrays for a display buffer
//! assert_eq!(lattice.activations().len(), 9);
//! assert_eq!(lattice.weights().len(), 27);
//! ```

mod binding;
mod config;
mod error;
mod input;
mod lattice;
mod seed;
mod topology;

pub use binding::{Binding, Bindings};
pub use config::{
    LatticeConfig, DEFAULT_ACTIVATION_THRESHOLD, DEFAULT_DECAY, DEFAULT_THRESHOLD_DECREASE,
    DEFAULT_THRESHOLD_INCREASE, DEFAULT_WEIGHT_DECREASE, DEFAULT_WEIGHT_INCREASE, WEIGHT_CEILING,
};
pub use error::LatticeError;
pub use input::{FrameReport, InputEvent, InputQueue};
pub use lattice::Lattice;
pub use seed::Seeding;
pub use topology::{wrap, Contact, Slot, Torus, CONTACTS};
