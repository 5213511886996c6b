use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub mod auth;
pub mod invoices;
pub mod production;
pub mod stock;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/change-password", post(auth::change_password))
        .route("/auth/me", get(auth::me))
        .route("/stock/:kind/:id/adjust", post(stock::adjust))
        .route("/production/check/:product_id/:qty", get(production::check))
        .route("/production", post(production::produce))
        .route("/production/:id/rejected", patch(production::update_rejected))
        .route("/production/:id", delete(production::remove))
        .route("/invoices/:id", get(invoices::get_invoice))
        .route("/invoices/:id/status", post(invoices::change_status))
        .route("/users", post(users::create))
        .route("/users/:id/active", post(users::set_active))
}
