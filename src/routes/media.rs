//! Image upload routes under `/api/upload`. Files pass straight through to
//! the media collaborator; only the returned URLs are this system's concern.

use axum::extract::{Multipart, Path, State};
use axum::routing::{delete, put};
use axum::{Json, Router};

use crate::auth::guard::AuthUser;
use crate::auth::policy::{Action, Resource};
use crate::error::{ApiError, ApiResult};
use crate::media::StoredImage;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", put(upload))
        .route("/delete/:id", delete(remove))
}

async fn upload(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<StoredImage>>> {
    state.policy.authorize(&caller, Resource::Media, Action::Create)?;
    let mut stored = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {e}")))?
    {
        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("failed reading upload: {e}")))?;
        stored.push(state.media.store(&filename, bytes.to_vec()).await?);
    }
    if stored.is_empty() {
        return Err(ApiError::validation("no images attached"));
    }
    Ok(Json(stored))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    state.policy.authorize(&caller, Resource::Media, Action::Delete)?;
    state.media.delete(&id).await?;
    Ok(Json(serde_json::json!({ "message": "image deleted" })))
}
