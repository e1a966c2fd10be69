//! Enquiry routes under `/api/enquiry`. Anyone may open an enquiry; the
//! rest of its lifecycle is staff-side.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::ApiResult;
use crate::models::enquiry::{EnquiryPayload, EnquiryUpdate};
use crate::models::Enquiry;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/:id", get(get_one).put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EnquiryPayload>,
) -> ApiResult<(StatusCode, Json<Enquiry>)> {
    Ok((StatusCode::CREATED, Json(state.enquiries.create(payload).await?)))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> ApiResult<Json<Vec<Enquiry>>> {
    state.policy.authorize(&caller, Resource::Enquiry, Action::List)?;
    Ok(Json(state.enquiries.all().await?))
}

async fn get_one(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Enquiry>> {
    state.policy.authorize(&caller, Resource::Enquiry, Action::Read)?;
    Ok(Json(state.enquiries.get(&id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
    Json(changes): Json<EnquiryUpdate>,
) -> ApiResult<Json<Enquiry>> {
    state.policy.authorize(&caller, Resource::Enquiry, Action::Update)?;
    Ok(Json(state.enquiries.update(&id, changes).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Enquiry>> {
    state.policy.authorize(&caller, Resource::Enquiry, Action::Delete)?;
    Ok(Json(state.enquiries.delete(&id).await?))
}
