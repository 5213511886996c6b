use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, MaterialId, ProductId};

/// One line of a product's bill of materials.
///
/// Invariant: `qty_per_unit > 0` (checked before any planning).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    pub product_id: ProductId,
    pub material_id: MaterialId,
    /// Quantity of the material required per unit of product.
    pub qty_per_unit: f64,
}

impl RecipeLine {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.qty_per_unit.is_finite() || self.qty_per_unit <= 0.0 {
            return Err(DomainError::invalid_recipe(format!(
                "material {} requires a positive quantity per unit",
                self.material_id
            )));
        }
        Ok(())
    }
}

/// A planned material deduction for one production run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedDeduction {
    pub material_id: MaterialId,
    pub amount: f64,
}

/// Expand a recipe into the per-material amounts a run of `quantity` units
/// will consume.
///
/// Fails with `NoRecipe` on an empty recipe and `InvalidRecipe` on any
/// malformed line; performs no mutation. The plan is ordered by material
/// id: callers lock one material row per deduction, and concurrent runs
/// over overlapping recipes must acquire those locks in the same order.
pub fn plan_production(
    recipe: &[RecipeLine],
    quantity: f64,
) -> Result<Vec<PlannedDeduction>, DomainError> {
    if recipe.is_empty() {
        return Err(DomainError::NoRecipe);
    }
    let mut plan = recipe
        .iter()
        .map(|line| {
            line.validate()?;
            Ok(PlannedDeduction {
                material_id: line.material_id,
                amount: line.qty_per_unit * quantity,
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    plan.sort_by_key(|d| d.material_id);
    Ok(plan)
}
