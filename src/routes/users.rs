//! Account, session, cart and order routes under `/api/user`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::Value;
use validator::Validate;

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::{ApiError, ApiResult};
use crate::models::cart::{ApplyCouponPayload, CheckoutPayload, SetCartPayload};
use crate::models::order::OrderStatusPayload;
use crate::models::user::{
    strip_secrets, AddressPayload, ForgotPasswordPayload, LoginPayload, LoginResponse,
    PasswordPayload, ProfileUpdate, RegisterPayload,
};
use crate::models::{Cart, Order, User};
use crate::services::to_json;
use crate::state::AppState;

const REFRESH_COOKIE: &str = "refreshToken";
const REFRESH_COOKIE_HOURS: i64 = 72;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/admin-login", post(admin_login))
        .route("/refresh", get(refresh))
        .route("/logout", get(logout))
        .route("/all-users", get(all_users))
        .route("/wishlist", get(wishlist))
        .route("/edit-user", put(edit_user))
        .route("/save-address", put(save_address))
        .route("/password", put(update_password))
        .route("/forgot-password-token", post(forgot_password_token))
        .route("/reset-password/:token", put(reset_password))
        .route("/block-user/:id", put(block_user))
        .route("/unblock-user/:id", put(unblock_user))
        .route("/cart", post(set_cart).get(get_cart))
        .route("/empty-cart", delete(empty_cart))
        .route("/cart/apply-coupon", post(apply_coupon))
        .route("/cart/create-order", post(create_order))
        .route("/get-orders", get(get_orders))
        .route("/all-orders", get(all_orders))
        .route("/update-order/:id", put(update_order))
        .route("/:id", get(get_user).delete(delete_user))
}

/// http-only cookie carrying the refresh token.
fn refresh_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::hours(REFRESH_COOKIE_HOURS));
    cookie
}

fn sanitized(user: &User) -> ApiResult<Value> {
    let mut value = to_json(user)?;
    strip_secrets(&mut value);
    Ok(value)
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state.users.register(payload).await?;
    Ok((StatusCode::CREATED, Json(sanitized(&user)?)))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let session = state.users.login(payload, false).await?;
    Ok((jar.add(refresh_cookie(session.refresh_token)), Json(session.response)))
}

async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let session = state.users.login(payload, true).await?;
    Ok((jar.add(refresh_cookie(session.refresh_token)), Json(session.response)))
}

async fn refresh(State(state): State<AppState>, jar: CookieJar) -> ApiResult<Json<Value>> {
    let token = jar
        .get(REFRESH_COOKIE)
        .ok_or_else(|| ApiError::unauthorized("no refresh token in cookies"))?
        .value()
        .to_string();
    let access_token = state.users.refresh_access_token(&token).await?;
    Ok(Json(serde_json::json!({ "accessToken": access_token })))
}

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, StatusCode)> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        state.users.logout(cookie.value()).await?;
    }
    Ok((jar.remove(Cookie::from(REFRESH_COOKIE)), StatusCode::NO_CONTENT))
}

async fn all_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<Value>>> {
    state.policy.authorize(&caller, Resource::User, Action::List)?;
    let users = state.users.all_users().await?;
    users.iter().map(sanitized).collect::<ApiResult<Vec<_>>>().map(Json)
}

async fn get_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.authorize(&caller, Resource::User, Action::Read)?;
    let user = state.users.get_user(&id).await?;
    Ok(Json(sanitized(&user)?))
}

async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.authorize(&caller, Resource::User, Action::Delete)?;
    let user = state.users.delete_user(&id).await?;
    Ok(Json(sanitized(&user)?))
}

async fn block_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.authorize(&caller, Resource::User, Action::Update)?;
    let user = state.users.set_blocked(&id, true).await?;
    Ok(Json(sanitized(&user)?))
}

async fn unblock_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policy.authorize(&caller, Resource::User, Action::Update)?;
    let user = state.users.set_blocked(&id, false).await?;
    Ok(Json(sanitized(&user)?))
}

async fn edit_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(changes): Json<ProfileUpdate>,
) -> ApiResult<Json<Value>> {
    let id = caller.id.ok_or(ApiError::NotFound("user"))?;
    let user = state.users.update_profile(id, changes).await?;
    Ok(Json(sanitized(&user)?))
}

async fn save_address(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<AddressPayload>,
) -> ApiResult<Json<Value>> {
    let id = caller.id.ok_or(ApiError::NotFound("user"))?;
    let user = state.users.save_address(id, payload).await?;
    Ok(Json(sanitized(&user)?))
}

async fn update_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<PasswordPayload>,
) -> ApiResult<Json<Value>> {
    payload.validate()?;
    let id = caller.id.ok_or(ApiError::NotFound("user"))?;
    let user = state.users.update_password(id, &payload.password).await?;
    Ok(Json(sanitized(&user)?))
}

async fn forgot_password_token(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> ApiResult<Json<Value>> {
    let token = state.users.forgot_password_token(payload).await?;
    Ok(Json(serde_json::json!({ "token": token })))
}

async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<PasswordPayload>,
) -> ApiResult<Json<Value>> {
    payload.validate()?;
    let user = state.users.reset_password(&token, &payload.password).await?;
    Ok(Json(sanitized(&user)?))
}

async fn wishlist(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.users.wishlist(&caller).await?))
}

async fn set_cart(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<SetCartPayload>,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.shopping.set_cart(&caller, payload.cart).await?))
}

async fn get_cart(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.shopping.get_cart(&caller).await?))
}

async fn empty_cart(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Cart>> {
    Ok(Json(state.shopping.empty_cart(&caller).await?))
}

async fn apply_coupon(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<ApplyCouponPayload>,
) -> ApiResult<Json<f64>> {
    Ok(Json(state.shopping.apply_coupon(&caller, &payload.coupon).await?))
}

async fn create_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CheckoutPayload>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    state.shopping.checkout(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "message": "success" }))))
}

async fn get_orders(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.shopping.orders_for(&caller).await?))
}

async fn all_orders(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<Value>>> {
    state.policy.authorize(&caller, Resource::Order, Action::List)?;
    Ok(Json(state.shopping.all_orders().await?))
}

async fn update_order(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusPayload>,
) -> ApiResult<Json<Order>> {
    state.policy.authorize(&caller, Resource::Order, Action::Update)?;
    Ok(Json(state.shopping.update_order_status(&id, payload).await?))
}
