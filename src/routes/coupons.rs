//! Coupon routes under `/api/coupon`. Entirely back-office: shoppers only
//! ever touch coupons through the cart's apply-coupon endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::ApiResult;
use crate::models::coupon::CouponPayload;
use crate::models::Coupon;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CouponPayload>,
) -> ApiResult<(StatusCode, Json<Coupon>)> {
    state.policy.authorize(&caller, Resource::Coupon, Action::Create)?;
    Ok((StatusCode::CREATED, Json(state.coupons.create(payload).await?)))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<Coupon>>> {
    state.policy.authorize(&caller, Resource::Coupon, Action::List)?;
    Ok(Json(state.coupons.all().await?))
}

async fn get_one(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Coupon>> {
    state.policy.authorize(&caller, Resource::Coupon, Action::Read)?;
    Ok(Json(state.coupons.get(&id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<CouponPayload>,
) -> ApiResult<Json<Coupon>> {
    state.policy.authorize(&caller, Resource::Coupon, Action::Update)?;
    Ok(Json(state.coupons.update(&id, payload).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Coupon>> {
    state.policy.authorize(&caller, Resource::Coupon, Action::Delete)?;
    Ok(Json(state.coupons.delete(&id).await?))
}
