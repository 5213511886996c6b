//! Transactional stock ledger.
//!
//! The single sanctioned path to mutate article quantities. Every change
//! row-locks the article, enforces non-negativity, writes the audit row,
//! then the new quantity, all inside one transaction.

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use atelier_core::DomainError;
use atelier_stock::{apply_delta, AdjustmentTag, Article, ArticleKind, ArticleRef};

use crate::error::InfraError;

/// Table behind each article kind. The names are enum-derived constants, so
/// interpolating them into SQL is safe.
pub(crate) fn table_for(kind: ArticleKind) -> &'static str {
    match kind {
        ArticleKind::Material => "materials",
        ArticleKind::Product => "products",
    }
}

#[derive(Clone)]
pub struct StockLedger {
    pool: PgPool,
}

impl StockLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically adjust an article's stock.
    ///
    /// Fails with `InsufficientStock` and rolls back entirely (no orphan
    /// audit row) if the delta would drive the quantity negative.
    #[instrument(skip(self), fields(kind = %article.kind, id = article.id, delta), err)]
    pub async fn adjust(
        &self,
        article: ArticleRef,
        delta: f64,
        actor: &str,
        tag: AdjustmentTag,
        reason: &str,
    ) -> Result<Article, InfraError> {
        let mut tx = self.pool.begin().await?;
        let updated = adjust_in_tx(&mut tx, article, delta, actor, tag, reason).await?;
        tx.commit().await?;
        Ok(updated)
    }
}

/// One ledger step inside a caller-owned transaction.
///
/// Production and delivery run several of these in a single transaction so
/// any failure aborts the whole batch.
pub async fn adjust_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    article: ArticleRef,
    delta: f64,
    actor: &str,
    tag: AdjustmentTag,
    reason: &str,
) -> Result<Article, InfraError> {
    let table = table_for(article.kind);

    let row = sqlx::query(&format!(
        "SELECT name, unit, quantity, min_quantity, unit_price FROM {table} WHERE id = $1 FOR UPDATE"
    ))
    .bind(article.id)
    .fetch_optional(&mut **tx)
    .await?;

    let Some(row) = row else {
        let err = match article.kind {
            ArticleKind::Product => DomainError::ProductNotFound,
            ArticleKind::Material => DomainError::NotFound,
        };
        return Err(err.into());
    };

    let name: String = row.get("name");
    let before: f64 = row.get("quantity");
    let after = apply_delta(&name, before, delta)?;

    // Audit row first, quantity second; both or neither.
    sqlx::query(
        r#"
        INSERT INTO stock_adjustments
            (article_kind, article_id, tag, quantity_before, delta, quantity_after,
             actor, reason, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        "#,
    )
    .bind(article.kind.as_str())
    .bind(article.id)
    .bind(tag.as_str())
    .bind(before)
    .bind(delta)
    .bind(after)
    .bind(actor)
    .bind(reason)
    .execute(&mut **tx)
    .await?;

    sqlx::query(&format!("UPDATE {table} SET quantity = $1 WHERE id = $2"))
        .bind(after)
        .bind(article.id)
        .execute(&mut **tx)
        .await?;

    let updated = Article {
        kind: article.kind,
        id: article.id,
        name,
        unit: row.get("unit"),
        quantity: after,
        min_quantity: row.get("min_quantity"),
        unit_price: row.get("unit_price"),
    };

    if updated.is_below_min() {
        tracing::warn!(
            article = %updated.name,
            quantity = updated.quantity,
            min = updated.min_quantity,
            "stock below minimum threshold"
        );
    }

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_kinds_map_to_their_tables() {
        assert_eq!(table_for(ArticleKind::Material), "materials");
        assert_eq!(table_for(ArticleKind::Product), "products");
    }
}
