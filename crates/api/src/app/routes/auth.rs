use std::sync::Arc;

use axum::{
    extract::Extension,
    http::HeaderMap,
    Json,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::AuthContext;

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let ip = client_ip(&headers);
    let user_agent = header_str(&headers, axum::http::header::USER_AGENT);

    match services
        .authenticator()
        .login(&body.identifier, &body.password, ip.as_deref(), user_agent)
        .await
    {
        Ok(outcome) => errors::ok(outcome),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
) -> axum::response::Response {
    match services.authenticator().logout(ctx.session().id).await {
        Ok(()) => errors::ok(serde_json::json!({ "logged_out": true })),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    match services
        .authenticator()
        .change_password(
            ctx.claims().sub,
            ctx.session().id,
            &body.old_password,
            &body.new_password,
        )
        .await
    {
        Ok(()) => errors::ok(serde_json::json!({ "changed": true })),
        Err(e) => errors::infra_error_response(&e),
    }
}

pub async fn me(Extension(ctx): Extension<AuthContext>) -> axum::response::Response {
    errors::ok(ctx.claims())
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, axum::http::HeaderName::from_static("x-forwarded-for"))
        .map(|v| v.split(',').next().unwrap_or(v).trim().to_string())
}

fn header_str(
    headers: &HeaderMap,
    name: impl axum::http::header::AsHeaderName,
) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
