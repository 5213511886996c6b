//! Pure delivery planning: per-line stock verification for the
//! delivered-triggers-deduction transition.

use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, ProductId};

use crate::invoice::InvoiceLine;

/// A product's current stock as loaded (and row-locked) by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStockView {
    pub product_id: ProductId,
    pub name: String,
    pub in_stock: f64,
}

/// A planned product deduction for one delivered line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDeduction {
    pub product_id: ProductId,
    pub amount: f64,
}

/// Verify every line against current product stock and plan the deductions.
///
/// Fails with `InsufficientStock` naming the product, its available amount
/// and the requested amount on the first shortfall; fails with
/// `ProductNotFound` if a line references a product absent from `stocks`.
/// No mutation.
pub fn plan_delivery(
    lines: &[InvoiceLine],
    stocks: &[ProductStockView],
) -> Result<Vec<LineDeduction>, DomainError> {
    lines
        .iter()
        .map(|line| {
            let stock = stocks
                .iter()
                .find(|s| s.product_id == line.product_id)
                .ok_or(DomainError::ProductNotFound)?;
            if line.quantity > stock.in_stock {
                return Err(DomainError::insufficient_stock(
                    &stock.name,
                    stock.in_stock,
                    line.quantity,
                ));
            }
            Ok(LineDeduction {
                product_id: line.product_id,
                amount: line.quantity,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product: i64, qty: f64) -> InvoiceLine {
        InvoiceLine {
            product_id: ProductId::new(product),
            quantity: qty,
            unit_price: 10.0,
            tax_rate: 0.0,
            discount: 0.0,
        }
    }

    fn stock(product: i64, name: &str, qty: f64) -> ProductStockView {
        ProductStockView {
            product_id: ProductId::new(product),
            name: name.to_string(),
            in_stock: qty,
        }
    }

    #[test]
    fn sufficient_stock_plans_one_deduction_per_line() {
        let plan = plan_delivery(&[line(1, 10.0)], &[stock(1, "chair", 15.0)]).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].amount, 10.0);
    }

    #[test]
    fn shortfall_names_product_available_and_requested() {
        let err = plan_delivery(&[line(1, 10.0)], &[stock(1, "chair", 5.0)]).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                article: "chair".into(),
                available: 5.0,
                requested: 10.0,
            }
        );
    }

    #[test]
    fn missing_product_row_is_product_not_found() {
        let err = plan_delivery(&[line(2, 1.0)], &[stock(1, "chair", 5.0)]).unwrap_err();
        assert_eq!(err, DomainError::ProductNotFound);
    }

    #[test]
    fn exact_stock_is_deliverable() {
        assert!(plan_delivery(&[line(1, 5.0)], &[stock(1, "chair", 5.0)]).is_ok());
    }
}
