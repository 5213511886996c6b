//! Invoice status machine: constrained transitions, with the terminal
//! delivered transition deducting product stock in the same transaction.

use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use atelier_core::{DomainError, InvoiceId};
use atelier_invoicing::{
    check_transition, plan_delivery, DocumentKind, Invoice, InvoiceLine, InvoiceStatus,
    ProductStockView,
};
use atelier_stock::{AdjustmentTag, ArticleRef};

use crate::error::InfraError;
use crate::ledger::adjust_in_tx;

#[derive(Clone)]
pub struct InvoiceEngine {
    pool: PgPool,
}

impl InvoiceEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the invoice aggregate (header + lines). Totals are derived by
    /// the caller via [`Invoice::totals`], never stored.
    #[instrument(skip(self), err)]
    pub async fn get(&self, invoice_id: InvoiceId) -> Result<Invoice, InfraError> {
        let row = sqlx::query("SELECT client_id, kind, status FROM invoices WHERE id = $1")
            .bind(invoice_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Err(DomainError::NotFound.into());
        };

        let lines = load_lines(&self.pool, invoice_id).await?;
        Ok(Invoice {
            id: invoice_id,
            client_id: row.get::<i64, _>("client_id").into(),
            kind: parse_kind(row.get("kind"))?,
            status: parse_status(row.get("status"))?,
            lines,
        })
    }

    /// Apply a status transition.
    ///
    /// For orders the transition must be in the fixed table, and moving to
    /// Delivered verifies and deducts product stock per line inside the same
    /// transaction as the status write: a shortfall anywhere leaves both
    /// status and stock untouched.
    #[instrument(skip(self), fields(invoice_id = %invoice_id, new_status), err)]
    pub async fn change_status(
        &self,
        invoice_id: InvoiceId,
        new_status: &str,
        actor: &str,
    ) -> Result<Invoice, InfraError> {
        let to: InvoiceStatus = new_status.parse()?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT kind, status FROM invoices WHERE id = $1 FOR UPDATE")
            .bind(invoice_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Err(DomainError::NotFound.into());
        };

        let kind = parse_kind(row.get("kind"))?;
        let from = parse_status(row.get("status"))?;
        check_transition(kind, from, to)?;

        if to == InvoiceStatus::Delivered && kind == DocumentKind::Order {
            let lines = load_lines(&mut *tx, invoice_id).await?;
            let stocks = lock_product_stocks(&mut tx, &lines).await?;
            let deductions = plan_delivery(&lines, &stocks)?;

            let reason = format!("delivery of order {invoice_id}");
            for deduction in &deductions {
                adjust_in_tx(
                    &mut tx,
                    ArticleRef::product(deduction.product_id),
                    -deduction.amount,
                    actor,
                    AdjustmentTag::InvoiceDelivery,
                    &reason,
                )
                .await?;
            }
        }

        sqlx::query("UPDATE invoices SET status = $1 WHERE id = $2")
            .bind(to.as_str())
            .bind(invoice_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get(invoice_id).await
    }
}

async fn load_lines(
    ex: impl sqlx::PgExecutor<'_>,
    invoice_id: InvoiceId,
) -> Result<Vec<InvoiceLine>, InfraError> {
    let rows = sqlx::query(
        "SELECT product_id, quantity, unit_price, tax_rate, discount \
         FROM invoice_lines WHERE invoice_id = $1",
    )
    .bind(invoice_id.as_i64())
    .fetch_all(ex)
    .await?;

    Ok(rows
        .iter()
        .map(|row| InvoiceLine {
            product_id: row.get::<i64, _>("product_id").into(),
            quantity: row.get("quantity"),
            unit_price: row.get("unit_price"),
            tax_rate: row.get("tax_rate"),
            discount: row.get("discount"),
        })
        .collect())
}

/// Row-lock the products referenced by the lines and return their stock.
async fn lock_product_stocks(
    tx: &mut Transaction<'_, Postgres>,
    lines: &[InvoiceLine],
) -> Result<Vec<ProductStockView>, InfraError> {
    let mut ids: Vec<i64> = lines.iter().map(|l| l.product_id.as_i64()).collect();
    ids.sort_unstable();
    ids.dedup();

    let rows = sqlx::query(
        "SELECT id, name, quantity FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
    )
    .bind(&ids)
    .fetch_all(&mut **tx)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ProductStockView {
            product_id: row.get::<i64, _>("id").into(),
            name: row.get("name"),
            in_stock: row.get("quantity"),
        })
        .collect())
}

fn parse_kind(s: String) -> Result<DocumentKind, InfraError> {
    Ok(s.parse::<DocumentKind>()?)
}

fn parse_status(s: String) -> Result<InvoiceStatus, InfraError> {
    Ok(s.parse::<InvoiceStatus>()?)
}
