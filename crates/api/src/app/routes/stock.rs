use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};

use atelier_auth::{require_permission, Permission};
use atelier_stock::{AdjustmentTag, ArticleKind, ArticleRef};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

/// Manual stock correction on a material or product.
pub async fn adjust(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path((kind, id)): Path<(String, i64)>,
    Json(body): Json<dto::AdjustStockRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::StockAdjust) {
        return errors::domain_error_response(&e);
    }

    let kind = match ArticleKind::parse(&kind) {
        Ok(k) => k,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "article kind must be 'material' or 'product'",
            )
        }
    };

    let reason = body.reason.as_deref().unwrap_or("manual adjustment");
    match services
        .ledger()
        .adjust(
            ArticleRef { kind, id },
            body.delta,
            ctx.username(),
            AdjustmentTag::Manual,
            reason,
        )
        .await
    {
        Ok(article) => errors::ok(article),
        Err(e) => errors::infra_error_response(&e),
    }
}
