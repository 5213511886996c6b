use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};

use atelier_auth::{require_permission, Permission};
use atelier_core::InvoiceId;
use atelier_invoicing::Invoice;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::InvoicesRead) {
        return errors::domain_error_response(&e);
    }

    match services.invoices().get(InvoiceId::new(id)).await {
        Ok(invoice) => errors::ok(invoice_view(&invoice)),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn change_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::ChangeStatusRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::InvoicesStatus) {
        return errors::domain_error_response(&e);
    }

    match services
        .invoices()
        .change_status(InvoiceId::new(id), &body.status, ctx.username())
        .await
    {
        Ok(invoice) => errors::ok(invoice_view(&invoice)),
        Err(e) => errors::infra_error_response(&e),
    }
}

/// Totals are always derived at read time, never read from storage.
fn invoice_view(invoice: &Invoice) -> serde_json::Value {
    serde_json::json!({
        "invoice": invoice,
        "totals": invoice.totals(),
    })
}
