//! Validated basket requests

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tier::Tier;

/// Number of model features: total, items, tier index
pub const FEATURE_COUNT: usize = 3;

/// Feature vector fed to the regression tree
pub type Features = [f64; FEATURE_COUNT];

/// A basket that passed validation and can be scored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasketRequest {
    /// Basket total, finite and >= 0
    pub total: f64,
    /// Number of items in the basket
    pub items: u32,
    /// Customer loyalty tier
    pub tier: Tier,
}

impl BasketRequest {
    /// Validate raw request fields into a basket
    pub fn new(total: f64, items: i64, tier: &str) -> Result<Self, ValidationError> {
        if !total.is_finite() {
            return Err(ValidationError::NonFiniteTotal);
        }
        if total < 0.0 {
            return Err(ValidationError::NegativeTotal(total));
        }
        if items < 0 {
            return Err(ValidationError::NegativeItems(items));
        }
        let items = u32::try_from(items).map_err(|_| ValidationError::ItemsOutOfRange(items))?;
        let tier = tier.parse::<Tier>()?;

        Ok(Self { total, items, tier })
    }

    pub fn features(&self) -> Features {
        [self.total, f64::from(self.items), self.tier.index() as f64]
    }
}
