//! Lattice configuration

use crate::error::LatticeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Activation above which a cell counts as firing.
pub const DEFAULT_ACTIVATION_THRESHOLD: f32 = 0.20;
/// Retention applied to a firing cell's activation each step.
pub const DEFAULT_DECAY: f32 = 0.75;
pub const DEFAULT_THRESHOLD_INCREASE: f32 = 1.01;
pub const DEFAULT_THRESHOLD_DECREASE: f32 = 0.99;
pub const DEFAULT_WEIGHT_INCREASE: f32 = 1.02;
pub const DEFAULT_WEIGHT_DECREASE: f32 = 0.99;

/// Upper bound for any weight produced by reinforcement.
pub const WEIGHT_CEILING: f32 = 1.0;

/// Configuration for a hexagonal lattice.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticeConfig {
    /// Number of columns.
    pub width: usize,

    /// Number of rows.
    pub height: usize,

    /// Activation a cell must exceed to be "firing" (decay, co-activation).
    pub activation_threshold: f32,

    /// Multiplicative decay of a firing cell's activation.
    pub decay: f32,

    /// Threshold factor when a firing cell is re-activated by its neighbors.
    pub threshold_increase: f32,

    /// Threshold factor in every other case.
    pub threshold_decrease: f32,

    /// Weight factor for co-active endpoints (result clamped to 1.0).
    pub weight_increase: f32,

    /// Weight factor otherwise. No floor is applied.
    pub weight_decrease: f32,
}

impl LatticeConfig {
    /// Create a configuration with the default learning rule.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            activation_threshold: DEFAULT_ACTIVATION_THRESHOLD,
            decay: DEFAULT_DECAY,
            threshold_increase: DEFAULT_THRESHOLD_INCREASE,
            threshold_decrease: DEFAULT_THRESHOLD_DECREASE,
            weight_increase: DEFAULT_WEIGHT_INCREASE,
            weight_decrease: DEFAULT_WEIGHT_DECREASE,
        }
    }

    pub fn with_activation_threshold(mut self, threshold: f32) -> Self {
        self.activation_threshold = threshold;
        self
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    /// Override both threshold adaptation factors.
    pub fn with_threshold_factors(mut self, increase: f32, decrease: f32) -> Self {
        self.threshold_increase = increase;
        self.threshold_decrease = decrease;
        self
    }

    /// Override both weight adaptation factors.
    pub fn with_weight_factors(mut self, increase: f32, decrease: f32) -> Self {
        self.weight_increase = increase;
        self.weight_decrease = decrease;
        self
    }

    /// Number of cells.
    pub fn cells(&self) -> usize {
        self.width * self.height
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.width == 0 || self.height == 0 {
            return Err(LatticeError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let too_large = LatticeError::TooLarge {
            width: self.width,
            height: self.height,
        };
        let cells = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| too_large.clone())?;
        if cells.checked_mul(3).is_none()
            || i64::try_from(self.width).is_err()
            || i64::try_from(self.height).is_err()
        {
            return Err(too_large);
        }
        if !self.activation_threshold.is_finite() {
            return Err(LatticeError::InvalidConfig(
                "activation_threshold must be finite",
            ));
        }
        let factors = [
            self.decay,
            self.threshold_increase,
            self.threshold_decrease,
            self.weight_increase,
            self.weight_decrease,
        ];
        if factors.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(LatticeError::InvalidConfig(
                "adaptation factors must be finite and > 0",
            ));
        }
        Ok(())
    }
}
