use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, ProductId, ProductionId};

/// A persisted production run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRun {
    pub id: ProductionId,
    pub product_id: ProductId,
    pub produced: f64,
    /// Rejected units (rebuts). Recorded for accounting; never exceeds
    /// `produced` and is not separately deducted from stock.
    pub rejected: f64,
    pub operator: String,
    pub comment: Option<String>,
    pub produced_at: DateTime<Utc>,
}

/// Validated input for the produce operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProduceRequest {
    pub product_id: ProductId,
    pub quantity: f64,
    pub operator: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub rejected: f64,
    /// Defaults to now when absent.
    #[serde(default)]
    pub produced_at: Option<DateTime<Utc>>,
}

impl ProduceRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.operator.trim().is_empty() {
            return Err(DomainError::validation("operator is required"));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        check_rejected_bounds(self.quantity, self.rejected)
    }
}

/// Rejects must satisfy `0 ≤ rejected ≤ produced`.
pub fn check_rejected_bounds(produced: f64, rejected: f64) -> Result<(), DomainError> {
    if !rejected.is_finite() || rejected < 0.0 {
        return Err(DomainError::validation("rejected quantity cannot be negative"));
    }
    if rejected > produced {
        return Err(DomainError::validation(
            "rejected quantity cannot exceed produced quantity",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quantity: f64, rejected: f64, operator: &str) -> ProduceRequest {
        ProduceRequest {
            product_id: ProductId::new(1),
            quantity,
            operator: operator.to_string(),
            comment: None,
            rejected,
            produced_at: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request(10.0, 2.0, "karim").validate().is_ok());
    }

    #[test]
    fn missing_operator_is_rejected() {
        assert!(request(10.0, 0.0, "  ").validate().is_err());
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(request(0.0, 0.0, "karim").validate().is_err());
        assert!(request(-3.0, 0.0, "karim").validate().is_err());
    }

    #[test]
    fn rejected_bounds_are_inclusive() {
        assert!(check_rejected_bounds(10.0, 0.0).is_ok());
        assert!(check_rejected_bounds(10.0, 10.0).is_ok());
        assert!(check_rejected_bounds(10.0, 10.5).is_err());
        assert!(check_rejected_bounds(10.0, -0.1).is_err());
    }
}
