//! Error types for the discount core
//!
//! Request validation is the only failure a caller can trigger at run time.
//! Model errors only surface while training at startup.

use thiserror::Error;

/// A basket request that cannot be scored
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Basket total below zero
    #[error("total must be non-negative, got {0}")]
    NegativeTotal(f64),

    /// Basket total is NaN or infinite
    #[error("total must be a finite number")]
    NonFiniteTotal,

    /// Item count below zero
    #[error("items must be non-negative, got {0}")]
    NegativeItems(i64),

    /// Item count does not fit the model's item range
    #[error("items out of range: {0}")]
    ItemsOutOfRange(i64),

    /// Tier is not one of bronze, silver, gold or platinum
    #[error("unknown tier '{0}', expected one of bronze, silver, gold, platinum")]
    UnknownTier(String),
}

impl ValidationError {
    /// Name of the request field that failed validation
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NegativeTotal(_) | ValidationError::NonFiniteTotal => "total",
            ValidationError::NegativeItems(_) | ValidationError::ItemsOutOfRange(_) => "items",
            ValidationError::UnknownTier(_) => "tier",
        }
    }
}

/// Errors raised while fitting the regression model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training set has {features} feature rows but {targets} targets")]
    DimensionMismatch { features: usize, targets: usize },

    #[error("invalid training parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidationError::UnknownTier("diamond".to_string());
        assert_eq!(
            err.to_string(),
            "unknown tier 'diamond', expected one of bronze, silver, gold, platinum"
        );

        let err = ValidationError::NegativeItems(-3);
        assert_eq!(err.to_string(), "items must be non-negative, got -3");
    }

    #[test]
    fn test_error_field() {
        assert_eq!(ValidationError::NegativeTotal(-1.0).field(), "total");
        assert_eq!(ValidationError::NonFiniteTotal.field(), "total");
        assert_eq!(ValidationError::NegativeItems(-1).field(), "items");
        assert_eq!(ValidationError::ItemsOutOfRange(1 << 40).field(), "items");
        assert_eq!(ValidationError::UnknownTier("x".into()).field(), "tier");
    }

    #[test]
    fn test_model_error_display() {
        let err = ModelError::DimensionMismatch {
            features: 3,
            targets: 2,
        };
        assert_eq!(err.to_string(), "training set has 3 feature rows but 2 targets");
    }
}
