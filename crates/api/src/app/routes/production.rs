use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};

use atelier_auth::{require_permission, Permission};
use atelier_core::{ProductId, ProductionId};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

/// Read-only feasibility check; reports per-ingredient shortfalls.
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((product_id, quantity)): Path<(i64, f64)>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::ProductionRead) {
        return errors::domain_error_response(&e);
    }

    match services
        .production()
        .check_availability(ProductId::new(product_id), quantity)
        .await
    {
        Ok(availability) => errors::ok(availability),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn produce(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ProduceRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::ProductionRun) {
        return errors::domain_error_response(&e);
    }

    let request = atelier_production::ProduceRequest {
        product_id: ProductId::new(body.product_id),
        quantity: body.quantity,
        operator: ctx.username().to_string(),
        comment: body.comment,
        rejected: body.rejected,
        produced_at: body.produced_at,
    };

    match services.production().produce(request).await {
        Ok(run) => errors::created(run),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn update_rejected(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::UpdateRejectedRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::ProductionRun) {
        return errors::domain_error_response(&e);
    }

    match services
        .production()
        .update_rejected(ProductionId::new(id), body.rejected)
        .await
    {
        Ok(run) => errors::ok(run),
        Err(e) => errors::infra_error_response(&e),
    }
}

/// Removes the run record only; stock movements it caused stand.
pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::ProductionRun) {
        return errors::domain_error_response(&e);
    }

    match services.production().delete(ProductionId::new(id)).await {
        Ok(()) => errors::ok(serde_json::json!({ "deleted": true })),
        Err(e) => errors::infra_error_response(&e),
    }
}
