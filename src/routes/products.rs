//! Product catalog routes under `/api/product`. Reads are public, writes
//! are back-office, wishlist and rating belong to the logged-in shopper.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::Value;

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::ApiResult;
use crate::models::product::{ProductPayload, ProductUpdate, RatingPayload, WishlistPayload};
use crate::models::user::strip_secrets;
use crate::models::Product;
use crate::services::to_json;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/wishlist", put(toggle_wishlist))
        .route("/rating", put(rate))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    state.policy.authorize(&caller, Resource::Product, Action::Create)?;
    Ok((StatusCode::CREATED, Json(state.products.create(payload).await?)))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.products.list(&params).await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.get(&id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    state.policy.authorize(&caller, Resource::Product, Action::Update)?;
    Ok(Json(state.products.update(&id, changes).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state.policy.authorize(&caller, Resource::Product, Action::Delete)?;
    Ok(Json(state.products.delete(&id).await?))
}

async fn toggle_wishlist(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<WishlistPayload>,
) -> ApiResult<Json<Value>> {
    let user = state.products.toggle_wishlist(&caller, &payload.prod_id).await?;
    let mut value = to_json(&user)?;
    strip_secrets(&mut value);
    Ok(Json(value))
}

async fn rate(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<RatingPayload>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.products.rate(&caller, payload).await?))
}
