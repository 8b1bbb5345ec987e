//! DiscountMate core
//!
//! Basket validation and the decision-tree model behind the discount
//! recommendation service.
//!
//! ## Overview
//!
//! - **Tier** (`tier`): the four loyalty tiers and their ordinal feature index.
//! - **Basket** (`basket`): validated request fields and the feature vector.
//! - **Training** (`training`): seeded synthetic dataset generation.
//! - **Tree** (`tree`): CART regression tree.
//! - **Model** (`model`): trained model with the discount clamp.
//!
//! ## Example
//!
//! ```rust,no_run
//! use discountmate_core::{BasketRequest, DiscountModel, TrainingConfig};
//!
//! let model = DiscountModel::train(&TrainingConfig::default()).unwrap();
//! let basket = BasketRequest::new(220.0, 5, "silver").unwrap();
//! let discount = model.predict(&basket);
//! assert!((0.0..=0.5).contains(&discount));
//! ```

pub mod basket;
pub mod error;
pub mod model;
pub mod tier;
pub mod training;
pub mod tree;

pub use basket::{BasketRequest, Features, FEATURE_COUNT};
pub use error::{ModelError, ValidationError};
pub use model::{clamp_discount, DiscountModel, ModelSummary, MAX_DISCOUNT, MIN_DISCOUNT};
pub use tier::Tier;
pub use training::{synthetic_dataset, Dataset, TrainingConfig};
pub use tree::{RegressionTree, TreeParams};
