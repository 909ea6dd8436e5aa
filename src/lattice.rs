//! Lattice - the hexagonal threshold network and its Hebbian step

use crate::binding::{Binding, Bindings};
use crate::config::{LatticeConfig, WEIGHT_CEILING};
use crate::error::LatticeError;
use crate::seed::Seeding;
use crate::topology::{Slot, Torus, CONTACTS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Toroidal hexagonal lattice of binary threshold units.
///
/// Three dense arrays hold the state:
/// - activation, one per cell (row-major)
/// - threshold, one per cell
/// - weight, three owned edge slots per cell
///
/// Each array has a scratch twin. A step writes the next generation into the
/// scratch buffers and swaps them in, so readers never see a half-updated
/// field.
///
/// Deserialization re-checks the configuration, array lengths and bindings,
/// so a loaded lattice upholds the same invariants as [`Lattice::new`].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LatticeState"))]
pub struct Lattice {
    config: LatticeConfig,
    torus: Torus,

    activation: Vec<f32>,
    threshold: Vec<f32>,
    weight: Vec<f32>,

    #[cfg_attr(feature = "serde", serde(skip))]
    next_activation: Vec<f32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    next_threshold: Vec<f32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    next_weight: Vec<f32>,

    bindings: Bindings,

    /// Total steps completed.
    tick_count: u64,
}

/// Serialized form of a [`Lattice`], checked before use.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct LatticeState {
    config: LatticeConfig,
    torus: Torus,
    activation: Vec<f32>,
    threshold: Vec<f32>,
    weight: Vec<f32>,
    bindings: Bindings,
    tick_count: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<LatticeState> for Lattice {
    type Error = LatticeError;

    fn try_from(state: LatticeState) -> Result<Self, Self::Error> {
        state.config.validate()?;
        let torus = Torus::new(state.config.width, state.config.height);
        if state.torus != torus {
            return Err(LatticeError::InvalidState(
                "torus does not match configured dimensions",
            ));
        }
        let cells = torus.cells();
        crate::seed::check_len("activation", &state.activation, cells)?;
        crate::seed::check_len("threshold", &state.threshold, cells)?;
        crate::seed::check_len("weight", &state.weight, cells * 3)?;

        let bound: Vec<_> = state.bindings.iter().map(|b| (b.x(), b.y())).collect();
        for (i, &(x, y)) in bound.iter().enumerate() {
            if x >= torus.width || y >= torus.height {
                return Err(LatticeError::InvalidState("binding outside the lattice"));
            }
            if bound[..i].contains(&(x, y)) {
                return Err(LatticeError::InvalidState("cell bound more than once"));
            }
        }

        Ok(Self {
            config: state.config,
            torus,
            activation: state.activation,
            threshold: state.threshold,
            weight: state.weight,
            next_activation: vec![0.0; cells],
            next_threshold: vec![0.0; cells],
            next_weight: vec![0.0; cells * 3],
            bindings: state.bindings,
            tick_count: state.tick_count,
        })
    }
}

/// Counts gathered during one step, for tracing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct StepSummary {
    firing: usize,
    strengthened: usize,
}

impl Lattice {
    /// Create a lattice from a validated configuration and a seeding policy.
    pub fn new(config: LatticeConfig, seeding: Seeding) -> Result<Self, LatticeError> {
        config.validate()?;
        let torus = Torus::new(config.width, config.height);
        let cells = torus.cells();
        let seed = seeding.materialize(cells)?;

        log::debug!(
            "[LATTICE] created {}x{} lattice ({} cells, {} edges)",
            config.width,
            config.height,
            cells,
            cells * 3
        );

        Ok(Self {
            config,
            torus,
            activation: seed.activation,
            threshold: seed.threshold,
            weight: seed.weight,
            next_activation: vec![0.0; cells],
            next_threshold: vec![0.0; cells],
            next_weight: vec![0.0; cells * 3],
            bindings: Bindings::new(),
            tick_count: 0,
        })
    }

    /// Randomly seeded lattice with the default learning rule.
    pub fn random(width: usize, height: usize) -> Result<Self, LatticeError> {
        Self::new(LatticeConfig::new(width, height), Seeding::default())
    }

    /// Uniformly seeded lattice with the default learning rule.
    pub fn uniform(
        width: usize,
        height: usize,
        activation: f32,
        threshold: f32,
        weight: f32,
    ) -> Result<Self, LatticeError> {
        Self::new(
            LatticeConfig::new(width, height),
            Seeding::Uniform {
                activation,
                threshold,
                weight,
            },
        )
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Activation of cell `(x, y)`.
    pub fn get(&self, x: i64, y: i64) -> f32 {
        self.activation[self.torus.cell(x, y)]
    }

    /// Overwrite the activation of cell `(x, y)`.
    pub fn set(&mut self, x: i64, y: i64, value: f32) {
        let i = self.torus.cell(x, y);
        self.activation[i] = value;
    }

    /// Flip cell `(x, y)` to `1 - value`. Returns the new value.
    pub fn toggle(&mut self, x: i64, y: i64) -> f32 {
        let i = self.torus.cell(x, y);
        self.activation[i] = 1.0 - self.activation[i];
        self.activation[i]
    }

    /// Weight of the edge cell `(x, y)` owns in `slot`.
    pub fn weight(&self, x: i64, y: i64, slot: Slot) -> f32 {
        self.weight[self.torus.edge(x, y, slot)]
    }

    /// Overwrite the weight cell `(x, y)` owns in `slot`.
    pub fn set_weight(&mut self, x: i64, y: i64, slot: Slot, value: f32) {
        let i = self.torus.edge(x, y, slot);
        self.weight[i] = value;
    }

    /// Adaptive threshold of cell `(x, y)`.
    pub fn threshold(&self, x: i64, y: i64) -> f32 {
        self.threshold[self.torus.cell(x, y)]
    }

    /// Overwrite the threshold of cell `(x, y)`.
    pub fn set_threshold(&mut self, x: i64, y: i64, value: f32) {
        let i = self.torus.cell(x, y);
        self.threshold[i] = value;
    }

    /// The six weights incident to `(x, y)`, in contact-table order.
    pub fn contact_weights(&self, x: i64, y: i64) -> [f32; 6] {
        CONTACTS.map(|c| self.weight[self.torus.contact_edge(x, y, &c)])
    }

    /// Flat activation field, row-major, `width * height` values.
    pub fn activations(&self) -> &[f32] {
        &self.activation
    }

    /// Flat threshold field, row-major.
    pub fn thresholds(&self) -> &[f32] {
        &self.threshold
    }

    /// Flat weight field, `width * height * 3` values.
    pub fn weights(&self) -> &[f32] {
        &self.weight
    }

    /// Get column count.
    pub fn width(&self) -> usize {
        self.torus.width
    }

    /// Get row count.
    pub fn height(&self) -> usize {
        self.torus.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.activation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activation.is_empty()
    }

    /// Get configuration.
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Get number of completed steps.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Active bindings, in insertion order.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    // =========================================================================
    // ACTIVATION RULE
    // =========================================================================

    /// Weighted sum of the six neighbor activations of `(x, y)`.
    pub fn weighted_sum(&self, x: i64, y: i64) -> f32 {
        let mut sum = 0.0f32;
        for c in &CONTACTS {
            sum += self.activation[self.torus.neighbor(x, y, c)]
                * self.weight[self.torus.contact_edge(x, y, c)];
        }
        sum
    }

    /// Binary gate: `1.0` if the weighted sum reaches the cell's threshold.
    pub fn activation(&self, x: i64, y: i64) -> f32 {
        if self.weighted_sum(x, y) < self.threshold(x, y) {
            0.0
        } else {
            1.0
        }
    }

    // =========================================================================
    // BINDINGS
    // =========================================================================

    /// Drive cell `(x, y)` from `samples`, replacing any existing binding.
    ///
    /// The first sample is written immediately; each following step writes
    /// the next one, wrapping back to the start.
    pub fn bind(&mut self, x: i64, y: i64, samples: Vec<f32>) -> Result<(), LatticeError> {
        let (x, y) = self.torus.wrap(x, y);
        let binding = Binding::new(x, y, samples).ok_or(LatticeError::EmptySequence { x, y })?;
        let first = binding.first();
        let len = binding.samples().len();
        let replaced = self.bindings.insert(binding);
        self.activation[y * self.torus.width + x] = first;

        log::debug!(
            "[BIND] ({}, {}): {} samples{}",
            x,
            y,
            len,
            if replaced { " (replaced)" } else { "" }
        );
        Ok(())
    }

    /// Stop driving cell `(x, y)`. The cell keeps its current activation.
    pub fn unbind(&mut self, x: i64, y: i64) -> bool {
        let (x, y) = self.torus.wrap(x, y);
        let removed = self.bindings.remove(x, y).is_some();
        if removed {
            log::debug!("[BIND] ({}, {}): released", x, y);
        }
        removed
    }

    // =========================================================================
    // TIME ADVANCEMENT
    // =========================================================================

    /// Advance the lattice by one tick.
    ///
    /// Activations and thresholds are computed from the pre-step state,
    /// then bindings override their cells, then weights adapt against the
    /// committed activations.
    pub fn step(&mut self) {
        let mut summary = StepSummary::default();

        self.update_cells(&mut summary);
        std::mem::swap(&mut self.activation, &mut self.next_activation);
        std::mem::swap(&mut self.threshold, &mut self.next_threshold);

        self.apply_bindings();

        self.update_weights(&mut summary);
        std::mem::swap(&mut self.weight, &mut self.next_weight);

        self.tick_count += 1;
        log::trace!(
            "[STEP] tick {}: {} firing, {} edges strengthened",
            self.tick_count,
            summary.firing,
            summary.strengthened
        );
    }

    /// Advance multiple ticks.
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    fn update_cells(&mut self, summary: &mut StepSummary) {
        let cfg = &self.config;
        let width = self.torus.width;
        for y in 0..self.torus.height {
            for x in 0..width {
                let i = y * width + x;
                let v = self.activation[i];
                let a = self.activation(x as i64, y as i64);
                let mut t = self.threshold[i];

                if v > cfg.activation_threshold {
                    // Hot cell: decay, and habituate if neighbors still drive it.
                    summary.firing += 1;
                    self.next_activation[i] = v * cfg.decay;
                    if a == 1.0 {
                        t *= cfg.threshold_increase;
                    } else {
                        t *= cfg.threshold_decrease;
                    }
                } else {
                    self.next_activation[i] = a;
                    t *= cfg.threshold_decrease;
                }
                self.next_threshold[i] = t;
            }
        }
    }

    fn apply_bindings(&mut self) {
        let width = self.torus.width;
        for binding in self.bindings.iter_mut() {
            let v = binding.advance();
            self.activation[binding.y() * width + binding.x()] = v;
        }
    }

    fn update_weights(&mut self, summary: &mut StepSummary) {
        let cfg = &self.config;
        let on = cfg.activation_threshold;
        let width = self.torus.width;
        for y in 0..self.torus.height {
            for x in 0..width {
                let i = y * width + x;
                let here = self.activation[i];
                for (k, c) in CONTACTS[..3].iter().enumerate() {
                    let edge = i * 3 + k;
                    let there = self.activation[self.torus.neighbor(x as i64, y as i64, c)];
                    let w = self.weight[edge];
                    self.next_weight[edge] = if here > on && there > on {
                        summary.strengthened += 1;
                        (w * cfg.weight_increase).min(WEIGHT_CEILING)
                    } else {
                        w * cfg.weight_decrease
                    };
                }
            }
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use serde_json::{json, Value};

    fn saved() -> Value {
        let mut lattice = Lattice::new(LatticeConfig::new(4, 3), Seeding::seeded(5)).unwrap();
        lattice.bind(1, 1, vec![0.2, 0.9]).unwrap();
        lattice.step_n(3);
        serde_json::to_value(&lattice).unwrap()
    }

    #[test]
    fn test_roundtrip_keeps_stepping() {
        let mut original = Lattice::new(LatticeConfig::new(4, 3), Seeding::seeded(5)).unwrap();
        original.bind(1, 1, vec![0.2, 0.9]).unwrap();
        original.step_n(3);

        let mut loaded: Lattice = serde_json::from_value(saved()).unwrap();
        assert_eq!(loaded.tick_count(), 3);
        original.step();
        loaded.step();
        assert_eq!(loaded.activations(), original.activations());
        assert_eq!(loaded.weights(), original.weights());
    }

    #[test]
    fn test_empty_binding_samples_rejected() {
        let mut state = saved();
        state["bindings"]["entries"][0]["samples"] = json!([]);
        let err = serde_json::from_value::<Lattice>(state).unwrap_err();
        assert!(err.to_string().contains("empty sequence"));
    }

    #[test]
    fn test_binding_cursor_past_end_rejected() {
        let mut state = saved();
        state["bindings"]["entries"][0]["cursor"] = json!(2);
        assert!(serde_json::from_value::<Lattice>(state).is_err());
    }

    #[test]
    fn test_binding_outside_lattice_rejected() {
        let mut state = saved();
        state["bindings"]["entries"][0]["x"] = json!(4);
        assert!(serde_json::from_value::<Lattice>(state).is_err());
    }

    #[test]
    fn test_short_weight_array_rejected() {
        let mut state = saved();
        state["weight"] = json!([0.5]);
        let err = serde_json::from_value::<Lattice>(state).unwrap_err();
        assert!(err.to_string().contains("weight seed has 1 values, expected 36"));
    }

    #[test]
    fn test_torus_mismatch_rejected() {
        let mut state = saved();
        state["torus"]["width"] = json!(5);
        assert!(serde_json::from_value::<Lattice>(state).is_err());
    }

    #[test]
    fn test_zero_dimension_config_rejected() {
        let mut state = saved();
        state["config"]["height"] = json!(0);
        assert!(serde_json::from_value::<Lattice>(state).is_err());
    }
}
