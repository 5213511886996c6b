//! User administration. Admin-only by permission.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};

use atelier_auth::{require_permission, Permission};
use atelier_core::UserId;
use atelier_infra::NewUser;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::UsersManage) {
        return errors::domain_error_response(&e);
    }

    let new_user = NewUser {
        username: body.username,
        email: body.email,
        password: body.password,
        full_name: body.full_name,
        role_id: body.role_id,
    };

    match services.authenticator().create_user(new_user).await {
        Ok(user) => errors::created(user),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn set_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(body): Json<dto::SetActiveRequest>,
) -> axum::response::Response {
    if let Err(e) = require_permission(ctx.claims(), Permission::UsersManage) {
        return errors::domain_error_response(&e);
    }

    match services
        .authenticator()
        .set_user_active(UserId::new(id), body.active)
        .await
    {
        Ok(()) => errors::ok(serde_json::json!({ "active": body.active })),
        Err(e) => errors::infra_error_response(&e),
    }
}
