use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::DomainError;

use crate::article::ArticleRef;

/// Tolerance for float-dust when checking the non-negativity invariant.
/// Quantities are fractional (kg, litres), so exact-zero comparisons would
/// reject legitimate full-consumption adjustments.
const EPSILON: f64 = 1e-9;

/// Why a stock quantity changed. Persisted on every audit row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentTag {
    /// Operator-initiated correction or receipt.
    Manual,
    /// Raw material consumed by a production run.
    ProductionConsumption,
    /// Finished product added by a production run.
    ProductionOutput,
    /// Product deducted when an order is delivered.
    InvoiceDelivery,
}

impl AdjustmentTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentTag::Manual => "manual",
            AdjustmentTag::ProductionConsumption => "production_consumption",
            AdjustmentTag::ProductionOutput => "production_output",
            AdjustmentTag::InvoiceDelivery => "invoice_delivery",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "manual" => Ok(AdjustmentTag::Manual),
            "production_consumption" => Ok(AdjustmentTag::ProductionConsumption),
            "production_output" => Ok(AdjustmentTag::ProductionOutput),
            "invoice_delivery" => Ok(AdjustmentTag::InvoiceDelivery),
            other => Err(DomainError::validation(format!(
                "unknown adjustment tag: {other}"
            ))),
        }
    }
}

/// Immutable audit row created atomically with every stock mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub article: ArticleRef,
    pub tag: AdjustmentTag,
    pub quantity_before: f64,
    pub delta: f64,
    pub quantity_after: f64,
    /// Username of the responsible actor.
    pub actor: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Compute the post-adjustment quantity, enforcing non-negativity.
///
/// This is the single rule every mutation path (manual adjust, production
/// consumption/output, delivery deduction) goes through. `article_name` is
/// only used to build the error.
pub fn apply_delta(
    article_name: &str,
    before: f64,
    delta: f64,
) -> Result<f64, DomainError> {
    if !delta.is_finite() {
        return Err(DomainError::validation("adjustment delta must be finite"));
    }
    let after = before + delta;
    if after < -EPSILON {
        return Err(DomainError::insufficient_stock(article_name, before, -delta));
    }
    // Clamp dust so repeated full consumptions cannot drift below zero.
    Ok(if after < 0.0 { 0.0 } else { after })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn positive_delta_increases_stock() {
        assert_eq!(apply_delta("steel", 10.0, 5.0).unwrap(), 15.0);
    }

    #[test]
    fn full_consumption_lands_on_zero() {
        assert_eq!(apply_delta("steel", 10.0, -10.0).unwrap(), 0.0);
    }

    #[test]
    fn overdraw_fails_and_names_the_article() {
        let err = apply_delta("steel", 5.0, -10.0).unwrap_err();
        match err {
            DomainError::InsufficientStock {
                article,
                available,
                requested,
            } => {
                assert_eq!(article, "steel");
                assert_eq!(available, 5.0);
                assert_eq!(requested, 10.0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_delta_is_rejected() {
        assert!(apply_delta("steel", 1.0, f64::NAN).is_err());
        assert!(apply_delta("steel", 1.0, f64::INFINITY).is_err());
    }

    proptest! {
        /// For any sequence of deltas, stock after every accepted adjustment
        /// stays non-negative and a rejected adjustment leaves it unchanged.
        #[test]
        fn stock_never_goes_negative(deltas in prop::collection::vec(-100.0f64..100.0, 0..64)) {
            let mut stock = 0.0f64;
            for delta in deltas {
                match apply_delta("x", stock, delta) {
                    Ok(after) => {
                        prop_assert!(after >= 0.0);
                        stock = after;
                    }
                    Err(_) => {
                        // Rejected: stock unchanged and still non-negative.
                        prop_assert!(stock >= 0.0);
                    }
                }
            }
        }
    }
}
