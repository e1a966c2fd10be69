//! Blog routes under `/api/blog`.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::Value;

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::{ApiError, ApiResult};
use crate::models::blog::{BlogPayload, BlogReaction, BlogUpdate};
use crate::models::Blog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/likes", put(like))
        .route("/dislikes", put(dislike))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<BlogPayload>,
) -> ApiResult<(StatusCode, Json<Blog>)> {
    state.policy.authorize(&caller, Resource::Blog, Action::Create)?;
    Ok((StatusCode::CREATED, Json(state.blogs.create(payload).await?)))
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<Vec<Value>>> {
    Ok(Json(state.blogs.list(&params).await?))
}

async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Blog>> {
    Ok(Json(state.blogs.get(&id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<BlogUpdate>,
) -> ApiResult<Json<Blog>> {
    state.policy.authorize(&caller, Resource::Blog, Action::Update)?;
    Ok(Json(state.blogs.update(&id, changes).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Blog>> {
    state.policy.authorize(&caller, Resource::Blog, Action::Delete)?;
    Ok(Json(state.blogs.delete(&id).await?))
}

async fn like(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<BlogReaction>,
) -> ApiResult<Json<Blog>> {
    let user_id = caller.id.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(state.blogs.like(&payload.blog_id, user_id).await?))
}

async fn dislike(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<BlogReaction>,
) -> ApiResult<Json<Blog>> {
    let user_id = caller.id.ok_or(ApiError::NotFound("user"))?;
    Ok(Json(state.blogs.dislike(&payload.blog_id, user_id).await?))
}
