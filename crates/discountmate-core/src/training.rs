//! Synthetic training data
//!
//! The service has no real purchase history, so the model is fitted on a
//! seeded synthetic dataset whose target grows with basket total, item count
//! and tier. The same seed always yields the same dataset.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::basket::Features;
use crate::error::ModelError;
use crate::model::{MAX_DISCOUNT, MIN_DISCOUNT};
use crate::tier::Tier;

const TOTAL_RANGE: std::ops::Range<f64> = 5.0..500.0;
const ITEMS_RANGE: std::ops::Range<u32> = 1..30;

/// Parameters for dataset generation and tree fitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of synthetic samples
    pub samples: usize,
    /// RNG seed for the synthetic dataset
    pub seed: u64,
    /// Standard deviation of the gaussian noise added to targets
    pub noise_std: f64,
    /// Maximum tree depth
    pub max_depth: usize,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split
    pub min_samples_leaf: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            samples: 400,
            seed: 42,
            noise_std: 0.01,
            max_depth: 4,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.samples == 0 {
            return Err(ModelError::InvalidParameter("samples must be > 0".into()));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParameter("max_depth must be > 0".into()));
        }
        if self.min_samples_split < 2 {
            return Err(ModelError::InvalidParameter(
                "min_samples_split must be >= 2".into(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ModelError::InvalidParameter(
                "min_samples_leaf must be > 0".into(),
            ));
        }
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(ModelError::InvalidParameter(
                "noise_std must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}

/// Feature rows with their regression targets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub features: Vec<Features>,
    pub targets: Vec<f64>,
}

impl Dataset {
    pub fn new(features: Vec<Features>, targets: Vec<f64>) -> Result<Self, ModelError> {
        if features.len() != targets.len() {
            return Err(ModelError::DimensionMismatch {
                features: features.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { features, targets })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Target used for a synthetic basket before noise and clipping
pub fn heuristic_discount(total: f64, items: f64, tier_index: f64) -> f64 {
    total / 1000.0 + items / 200.0 + tier_index * 0.05
}

/// Generate the seeded synthetic dataset
pub fn synthetic_dataset(config: &TrainingConfig) -> Result<Dataset, ModelError> {
    let noise = Normal::new(0.0, config.noise_std)
        .map_err(|e| ModelError::InvalidParameter(format!("noise_std: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut features = Vec::with_capacity(config.samples);
    let mut targets = Vec::with_capacity(config.samples);

    for _ in 0..config.samples {
        let total = rng.gen_range(TOTAL_RANGE);
        let items = f64::from(rng.gen_range(ITEMS_RANGE));
        let tier = rng.gen_range(0..Tier::ALL.len()) as f64;

        let target = (heuristic_discount(total, items, tier) + noise.sample(&mut rng))
            .clamp(MIN_DISCOUNT, MAX_DISCOUNT);

        features.push([total, items, tier]);
        targets.push(target);
    }

    Ok(Dataset { features, targets })
}
