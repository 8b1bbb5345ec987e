//! Property tests for the discount model
//!
//! Any basket that passes validation scores inside the discount band, and
//! anything negative or with an unknown tier never reaches the model.

use discountmate_core::{BasketRequest, DiscountModel, Tier, TrainingConfig, ValidationError};
use proptest::prelude::*;
use std::sync::OnceLock;

fn model() -> &'static DiscountModel {
    static MODEL: OnceLock<DiscountModel> = OnceLock::new();
    MODEL.get_or_init(|| DiscountModel::train(&TrainingConfig::default()).unwrap())
}

fn tier_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["bronze", "silver", "gold", "platinum", "GOLD", "Silver"])
}

proptest! {
    #[test]
    fn discount_always_in_band(
        total in 0.0f64..1.0e9,
        items in 0i64..1_000_000,
        tier in tier_name(),
    ) {
        let basket = BasketRequest::new(total, items, tier).unwrap();
        let discount = model().predict(&basket);
        prop_assert!((0.0..=0.5).contains(&discount));
    }

    #[test]
    fn negative_total_rejected(total in -1.0e9f64..-1.0e-9, items in 0i64..100) {
        let err = BasketRequest::new(total, items, "gold").unwrap_err();
        prop_assert_eq!(err, ValidationError::NegativeTotal(total));
    }

    #[test]
    fn negative_items_rejected(total in 0.0f64..1000.0, items in i64::MIN..0) {
        let err = BasketRequest::new(total, items, "gold").unwrap_err();
        prop_assert_eq!(err, ValidationError::NegativeItems(items));
    }

    #[test]
    fn unknown_tier_rejected(tier in "[a-z]{1,12}") {
        prop_assume!(tier.parse::<Tier>().is_err());
        let err = BasketRequest::new(10.0, 1, &tier).unwrap_err();
        prop_assert_eq!(err, ValidationError::UnknownTier(tier.clone()));
    }
}

#[test]
fn every_tier_scores_in_band() {
    for tier in Tier::ALL {
        for total in [0.0, 5.0, 220.0, 499.9, 10_000.0] {
            let basket = BasketRequest::new(total, 5, tier.as_str()).unwrap();
            let discount = model().predict(&basket);
            assert!((0.0..=0.5).contains(&discount), "{tier} {total} -> {discount}");
        }
    }
}
