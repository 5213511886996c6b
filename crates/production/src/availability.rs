use serde::{Deserialize, Serialize};

use atelier_core::{DomainError, MaterialId};

/// A recipe line joined with its material's current stock, as loaded by the
/// engine before an availability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientStock {
    pub material_id: MaterialId,
    pub material_name: String,
    pub qty_per_unit: f64,
    pub in_stock: f64,
}

/// Per-ingredient verdict: how much is needed versus available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientAvailability {
    pub material_id: MaterialId,
    pub material_name: String,
    pub needed: f64,
    pub available: f64,
    /// Amount missing; zero for sufficient ingredients.
    pub shortfall: f64,
}

/// Result of a pure availability check. No mutation has occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub possible: bool,
    pub sufficient: Vec<IngredientAvailability>,
    pub insufficient: Vec<IngredientAvailability>,
}

/// Partition a product's ingredients into sufficient/insufficient for a run
/// of `quantity` units.
///
/// Used both standalone (pre-check endpoint) and by `produce` as its
/// feasibility gate. Fails with `NoRecipe` for an empty recipe and
/// `InvalidRecipe` when a line's quantity-per-unit is missing or ≤ 0.
pub fn check_availability(
    ingredients: &[IngredientStock],
    quantity: f64,
) -> Result<Availability, DomainError> {
    if ingredients.is_empty() {
        return Err(DomainError::NoRecipe);
    }

    let mut sufficient = Vec::new();
    let mut insufficient = Vec::new();

    for ing in ingredients {
        if !ing.qty_per_unit.is_finite() || ing.qty_per_unit <= 0.0 {
            return Err(DomainError::invalid_recipe(format!(
                "material {} ({}) requires a positive quantity per unit",
                ing.material_id, ing.material_name
            )));
        }

        let needed = ing.qty_per_unit * quantity;
        let verdict = IngredientAvailability {
            material_id: ing.material_id,
            material_name: ing.material_name.clone(),
            needed,
            available: ing.in_stock,
            shortfall: (needed - ing.in_stock).max(0.0),
        };

        if needed <= ing.in_stock {
            sufficient.push(verdict);
        } else {
            insufficient.push(verdict);
        }
    }

    Ok(Availability {
        possible: insufficient.is_empty(),
        sufficient,
        insufficient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ing(id: i64, name: &str, per_unit: f64, in_stock: f64) -> IngredientStock {
        IngredientStock {
            material_id: MaterialId::new(id),
            material_name: name.to_string(),
            qty_per_unit: per_unit,
            in_stock,
        }
    }

    #[test]
    fn all_sufficient_means_possible() {
        let avail = check_availability(&[ing(1, "steel", 2.0, 50.0)], 10.0).unwrap();
        assert!(avail.possible);
        assert_eq!(avail.sufficient.len(), 1);
        assert!(avail.insufficient.is_empty());
        assert_eq!(avail.sufficient[0].needed, 20.0);
    }

    #[test]
    fn shortfall_is_reported_per_ingredient() {
        let avail = check_availability(
            &[ing(1, "steel", 2.0, 50.0), ing(2, "paint", 1.5, 10.0)],
            12.0,
        )
        .unwrap();
        assert!(!avail.possible);
        assert_eq!(avail.sufficient.len(), 1);
        assert_eq!(avail.insufficient.len(), 1);
        let short = &avail.insufficient[0];
        assert_eq!(short.material_name, "paint");
        assert_eq!(short.needed, 18.0);
        assert_eq!(short.available, 10.0);
        assert_eq!(short.shortfall, 8.0);
    }

    #[test]
    fn exact_stock_counts_as_sufficient() {
        let avail = check_availability(&[ing(1, "steel", 2.0, 20.0)], 10.0).unwrap();
        assert!(avail.possible);
    }

    #[test]
    fn empty_recipe_fails_with_no_recipe() {
        assert_eq!(check_availability(&[], 1.0), Err(DomainError::NoRecipe));
    }

    #[test]
    fn zero_per_unit_fails_with_invalid_recipe() {
        let err = check_availability(&[ing(1, "steel", 0.0, 10.0)], 1.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRecipe(_)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_ingredients() -> impl Strategy<Value = Vec<IngredientStock>> {
            prop::collection::vec(
                (1i64..100, 0.01f64..10.0, 0.0f64..1000.0)
                    .prop_map(|(id, per_unit, stock)| ing(id, "m", per_unit, stock)),
                1..8,
            )
        }

        proptest! {
            /// The partition is exhaustive and the verdicts are consistent:
            /// every ingredient lands on exactly one side, shortfall is
            /// positive exactly on the insufficient side, and `possible`
            /// holds iff nothing is insufficient.
            #[test]
            fn partition_is_exhaustive_and_consistent(
                ingredients in any_ingredients(),
                quantity in 0.01f64..100.0,
            ) {
                let avail = check_availability(&ingredients, quantity).unwrap();
                prop_assert_eq!(
                    avail.sufficient.len() + avail.insufficient.len(),
                    ingredients.len()
                );
                for v in &avail.sufficient {
                    prop_assert_eq!(v.shortfall, 0.0);
                }
                for v in &avail.insufficient {
                    prop_assert!(v.shortfall > 0.0);
                }
                prop_assert_eq!(avail.possible, avail.insufficient.is_empty());
            }
        }
    }
}
