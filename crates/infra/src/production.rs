//! Production engine: consumes a recipe to convert material stock into
//! finished-product stock.

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use atelier_core::{DomainError, ProductId, ProductionId};
use atelier_production::{
    check_availability, plan_production, Availability, IngredientStock, ProduceRequest,
    ProductionRun, RecipeLine,
};
use atelier_stock::{AdjustmentTag, ArticleRef};

use crate::error::InfraError;
use crate::ledger::adjust_in_tx;

#[derive(Clone)]
pub struct ProductionEngine {
    pool: PgPool,
}

impl ProductionEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pure pre-check: partition the recipe into sufficient/insufficient
    /// ingredients for a run of `quantity` units. Mutates nothing.
    #[instrument(skip(self), err)]
    pub async fn check_availability(
        &self,
        product_id: ProductId,
        quantity: f64,
    ) -> Result<Availability, InfraError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(DomainError::validation("quantity must be positive").into());
        }

        let rows = sqlx::query(
            r#"
            SELECT r.material_id, m.name, r.qty_per_unit, m.quantity AS in_stock
            FROM recipe_lines r
            JOIN materials m ON m.id = r.material_id
            WHERE r.product_id = $1
            "#,
        )
        .bind(product_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let ingredients: Vec<IngredientStock> = rows
            .iter()
            .map(|row| IngredientStock {
                material_id: row.get::<i64, _>("material_id").into(),
                material_name: row.get("name"),
                qty_per_unit: row.get("qty_per_unit"),
                in_stock: row.get("in_stock"),
            })
            .collect();

        Ok(check_availability(&ingredients, quantity)?)
    }

    /// Run a production: deduct every ingredient, credit the product, and
    /// insert the run row, all in one transaction. Any single ingredient
    /// shortfall aborts the whole run.
    #[instrument(skip(self, request), fields(product_id = %request.product_id, quantity = request.quantity), err)]
    pub async fn produce(&self, request: ProduceRequest) -> Result<ProductionRun, InfraError> {
        request.validate()?;

        let produced_at = request.produced_at.unwrap_or_else(chrono::Utc::now);
        let mut tx = self.pool.begin().await?;

        let product = sqlx::query("SELECT name FROM products WHERE id = $1 FOR UPDATE")
            .bind(request.product_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(product) = product else {
            return Err(DomainError::ProductNotFound.into());
        };
        let product_name: String = product.get("name");

        let recipe = load_recipe(&mut tx, request.product_id).await?;
        let plan = plan_production(&recipe, request.quantity)?;

        let reason = format!("production of {product_name}");
        for deduction in &plan {
            adjust_in_tx(
                &mut tx,
                ArticleRef::material(deduction.material_id),
                -deduction.amount,
                &request.operator,
                AdjustmentTag::ProductionConsumption,
                &reason,
            )
            .await?;
        }

        adjust_in_tx(
            &mut tx,
            ArticleRef::product(request.product_id),
            request.quantity,
            &request.operator,
            AdjustmentTag::ProductionOutput,
            &reason,
        )
        .await?;

        // Next id computed in-transaction: ids stay dense and deterministic
        // even after deletions.
        let next_id: i64 = sqlx::query("SELECT COALESCE(MAX(id), 0) + 1 AS next FROM production_runs")
            .fetch_one(&mut *tx)
            .await?
            .get("next");

        sqlx::query(
            r#"
            INSERT INTO production_runs
                (id, product_id, produced, rejected, operator, comment, produced_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(next_id)
        .bind(request.product_id.as_i64())
        .bind(request.quantity)
        .bind(request.rejected)
        .bind(&request.operator)
        .bind(&request.comment)
        .bind(produced_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ProductionRun {
            id: ProductionId::new(next_id),
            product_id: request.product_id,
            produced: request.quantity,
            rejected: request.rejected,
            operator: request.operator,
            comment: request.comment,
            produced_at,
        })
    }

    /// Correct the rejected count of an existing run. Does not retroactively
    /// adjust stock.
    #[instrument(skip(self), err)]
    pub async fn update_rejected(
        &self,
        production_id: ProductionId,
        rejected: f64,
    ) -> Result<ProductionRun, InfraError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT product_id, produced, operator, comment, produced_at \
             FROM production_runs WHERE id = $1 FOR UPDATE",
        )
        .bind(production_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Err(DomainError::NotFound.into());
        };

        let produced: f64 = row.get("produced");
        atelier_production::check_rejected_bounds(produced, rejected)?;

        sqlx::query("UPDATE production_runs SET rejected = $1 WHERE id = $2")
            .bind(rejected)
            .bind(production_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ProductionRun {
            id: production_id,
            product_id: row.get::<i64, _>("product_id").into(),
            produced,
            rejected,
            operator: row.get("operator"),
            comment: row.get("comment"),
            produced_at: row.get("produced_at"),
        })
    }

    /// Remove a run's record. This is a record correction, not an undo: the
    /// stock changes the run caused are deliberately left standing.
    #[instrument(skip(self), err)]
    pub async fn delete(&self, production_id: ProductionId) -> Result<(), InfraError> {
        let result = sqlx::query("DELETE FROM production_runs WHERE id = $1")
            .bind(production_id.as_i64())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound.into());
        }
        Ok(())
    }
}

async fn load_recipe(
    tx: &mut Transaction<'_, Postgres>,
    product_id: ProductId,
) -> Result<Vec<RecipeLine>, InfraError> {
    // Ordered so concurrent produce calls lock material rows consistently.
    let rows = sqlx::query(
        "SELECT material_id, qty_per_unit FROM recipe_lines WHERE product_id = $1 \
         ORDER BY material_id",
    )
    .bind(product_id.as_i64())
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .iter()
        .map(|row| RecipeLine {
            product_id,
            material_id: row.get::<i64, _>("material_id").into(),
            qty_per_unit: row.get("qty_per_unit"),
        })
        .collect())
}
