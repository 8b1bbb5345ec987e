//! Discount model
//!
//! Wraps the regression tree trained on the synthetic dataset and clamps every
//! prediction into the allowed discount band.

use serde::Serialize;
use tracing::{debug, info};

use crate::basket::BasketRequest;
use crate::error::ModelError;
use crate::training::{synthetic_dataset, TrainingConfig};
use crate::tree::{RegressionTree, TreeParams};

/// Smallest discount ever returned
pub const MIN_DISCOUNT: f64 = 0.0;

/// Largest discount ever returned
pub const MAX_DISCOUNT: f64 = 0.5;

/// Clamp a raw estimate into [`MIN_DISCOUNT`, `MAX_DISCOUNT`]; NaN maps to the minimum
pub fn clamp_discount(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_DISCOUNT;
    }
    raw.clamp(MIN_DISCOUNT, MAX_DISCOUNT)
}

/// Shape of the fitted model, for startup logs and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSummary {
    pub training_samples: usize,
    pub depth: usize,
    pub leaves: usize,
}

/// Immutable discount model, trained once and shared read-only
#[derive(Debug, Clone)]
pub struct DiscountModel {
    tree: RegressionTree,
}

impl DiscountModel {
    /// Generate the synthetic dataset and fit the tree
    pub fn train(config: &TrainingConfig) -> Result<Self, ModelError> {
        config.validate()?;

        let data = synthetic_dataset(config)?;
        let tree = RegressionTree::fit(&data, &TreeParams::from(config))?;
        let model = Self { tree };

        let summary = model.summary();
        info!(
            samples = summary.training_samples,
            depth = summary.depth,
            leaves = summary.leaves,
            seed = config.seed,
            "Discount model trained"
        );

        Ok(model)
    }

    /// Wrap an already fitted tree
    pub fn from_tree(tree: RegressionTree) -> Self {
        Self { tree }
    }

    /// Raw tree output, before clamping
    pub fn raw_estimate(&self, basket: &BasketRequest) -> f64 {
        self.tree.predict(&basket.features())
    }

    /// Recommended discount for a validated basket, always within the band
    pub fn predict(&self, basket: &BasketRequest) -> f64 {
        let raw = self.raw_estimate(basket);
        let discount = clamp_discount(raw);
        debug!(
            total = basket.total,
            items = basket.items,
            tier = %basket.tier,
            raw,
            discount,
            "Scored basket"
        );
        discount
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            training_samples: self.tree.training_samples(),
            depth: self.tree.depth(),
            leaves: self.tree.leaf_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::Dataset;

    fn model() -> DiscountModel {
        DiscountModel::train(&TrainingConfig::default()).unwrap()
    }

    #[test]
    fn test_clamp_discount() {
        assert_eq!(clamp_discount(-0.2), 0.0);
        assert_eq!(clamp_discount(0.25), 0.25);
        assert_eq!(clamp_discount(0.9), 0.5);
        assert_eq!(clamp_discount(f64::NAN), 0.0);
        assert_eq!(clamp_discount(f64::INFINITY), 0.5);
        assert_eq!(clamp_discount(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_train_summary() {
        let summary = model().summary();
        assert_eq!(summary.training_samples, 400);
        assert!(summary.depth >= 1 && summary.depth <= 4);
        assert!(summary.leaves >= 2 && summary.leaves <= 16);
    }

    #[test]
    fn test_example_basket_in_range() {
        let basket = BasketRequest::new(220.0, 5, "silver").unwrap();
        let discount = model().predict(&basket);
        assert!((MIN_DISCOUNT..=MAX_DISCOUNT).contains(&discount));
    }

    #[test]
    fn test_bigger_basket_higher_tier_not_smaller() {
        let model = model();
        let low = model.predict(&BasketRequest::new(50.0, 2, "bronze").unwrap());
        let high = model.predict(&BasketRequest::new(300.0, 10, "gold").unwrap());
        assert!((0.0..=0.5).contains(&low));
        assert!((0.0..=0.5).contains(&high));
        assert!(high >= low);
    }

    #[test]
    fn test_training_is_reproducible() {
        let a = model();
        let b = model();
        for tier in ["bronze", "silver", "gold", "platinum"] {
            let basket = BasketRequest::new(123.0, 7, tier).unwrap();
            assert_eq!(a.predict(&basket), b.predict(&basket));
        }
    }

    #[test]
    fn test_out_of_band_tree_is_clamped() {
        let data = Dataset::new(vec![[1.0, 1.0, 0.0], [100.0, 1.0, 0.0]], vec![-1.0, 3.0]).unwrap();
        let tree = RegressionTree::fit(&data, &TreeParams::default()).unwrap();
        let model = DiscountModel::from_tree(tree);

        let low = BasketRequest::new(1.0, 1, "bronze").unwrap();
        let high = BasketRequest::new(100.0, 1, "bronze").unwrap();
        assert_eq!(model.raw_estimate(&low), -1.0);
        assert_eq!(model.predict(&low), MIN_DISCOUNT);
        assert_eq!(model.raw_estimate(&high), 3.0);
        assert_eq!(model.predict(&high), MAX_DISCOUNT);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrainingConfig {
            samples: 0,
            ..Default::default()
        };
        assert!(DiscountModel::train(&config).is_err());
    }
}
