//! Initial lattice state

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::LatticeError;

/// How a new lattice populates its activation, threshold and weight arrays.
#[derive(Clone, Debug, PartialEq)]
pub enum Seeding {
    /// Activation uniform in `[0, 0.5)`, threshold and weight uniform in
    /// `[0, 1)`. A fixed seed reproduces the same lattice; `None` draws the
    /// seed from the OS.
    Random { seed: Option<u64> },

    /// Every cell and edge gets the same value.
    Uniform {
        activation: f32,
        threshold: f32,
        weight: f32,
    },

    /// Caller-supplied arrays, row-major. `weight` holds three slots per cell.
    Explicit {
        activation: Vec<f32>,
        threshold: Vec<f32>,
        weight: Vec<f32>,
    },
}

/// Seeded arrays, lengths already checked.
pub(crate) struct SeedArrays {
    pub activation: Vec<f32>,
    pub threshold: Vec<f32>,
    pub weight: Vec<f32>,
}

pub(crate) fn check_len(field: &'static str, values: &[f32], expected: usize) -> Result<(), LatticeError> {
    if values.len() != expected {
        return Err(LatticeError::LengthMismatch {
            field,
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

impl Seeding {
    /// Random seeding with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Seeding::Random { seed: Some(seed) }
    }

    pub(crate) fn materialize(self, cells: usize) -> Result<SeedArrays, LatticeError> {
        match self {
            Seeding::Random { seed } => {
                let mut rng = match seed {
                    Some(seed) => SmallRng::seed_from_u64(seed),
                    None => SmallRng::from_os_rng(),
                };
                // Per-cell values first, then the edge weights.
                let mut activation = Vec::with_capacity(cells);
                let mut threshold = Vec::with_capacity(cells);
                for _ in 0..cells {
                    activation.push(rng.random::<f32>() * 0.5);
                    threshold.push(rng.random::<f32>());
                }
                let weight = (0..cells * 3).map(|_| rng.random::<f32>()).collect();
                Ok(SeedArrays {
                    activation,
                    threshold,
                    weight,
                })
            }
            Seeding::Uniform {
                activation,
                threshold,
                weight,
            } => Ok(SeedArrays {
                activation: vec![activation; cells],
                threshold: vec![threshold; cells],
                weight: vec![weight; cells * 3],
            }),
            Seeding::Explicit {
                activation,
                threshold,
                weight,
            } => {
                check_len("activation", &activation, cells)?;
                check_len("threshold", &threshold, cells)?;
                check_len("weight", &weight, cells * 3)?;
                Ok(SeedArrays {
                    activation,
                    threshold,
                    weight,
                })
            }
        }
    }
}

impl Default for Seeding {
    fn default() -> Self {
        Seeding::Random { seed: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ranges() {
        let arrays = Seeding::seeded(7).materialize(50).unwrap();
        assert_eq!(arrays.activation.len(), 50);
        assert_eq!(arrays.weight.len(), 150);
        assert!(arrays.activation.iter().all(|v| (0.0..0.5).contains(v)));
        assert!(arrays.threshold.iter().all(|v| (0.0..1.0).contains(v)));
        assert!(arrays.weight.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = Seeding::seeded(42).materialize(16).unwrap();
        let b = Seeding::seeded(42).materialize(16).unwrap();
        let c = Seeding::seeded(43).materialize(16).unwrap();
        assert_eq!(a.weight, b.weight);
        assert_ne!(a.weight, c.weight);
    }

    #[test]
    fn test_explicit_length_checked() {
        let seeding = Seeding::Explicit {
            activation: vec![0.0; 4],
            threshold: vec![0.5; 4],
            weight: vec![0.5; 11],
        };
        assert_eq!(
            seeding.materialize(4).err(),
            Some(LatticeError::LengthMismatch {
                field: "weight",
                expected: 12,
                actual: 11,
            })
        );
    }
}
