//! HTTP surface: one router module per resource, mounted under `/api`.

pub mod blogs;
pub mod catalog;
pub mod coupons;
pub mod enquiries;
pub mod media;
pub mod products;
pub mod users;

use axum::http::{StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/user", users::router())
        .nest("/api/product", products::router())
        .nest("/api/blog", blogs::router())
        .nest("/api/category", catalog::categories::router())
        .nest("/api/blogcategory", catalog::blog_categories::router())
        .nest("/api/brand", catalog::brands::router())
        .nest("/api/color", catalog::colors::router())
        .nest("/api/coupon", coupons::router())
        .nest("/api/enquiry", enquiries::router())
        .nest("/api/upload", media::router())
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "oxcart" }))
}

/// Unknown routes get the same error envelope as everything else.
async fn not_found(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "message": format!("route not found: {uri}"),
            "stack": serde_json::Value::Null,
        })),
    )
}
