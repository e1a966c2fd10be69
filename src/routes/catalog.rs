//! Lookup-entity routes: categories, brands, colors and blog categories
//! share one handler set; only the backing service and policy resource
//! differ, so a macro stamps out a module per collection.

macro_rules! lookup_routes {
    ($name:ident, $field:ident, $entity:ident, $resource:ident) => {
        pub mod $name {
            use axum::extract::{Path, State};
            use axum::http::StatusCode;
            use axum::routing::{get, post};
            use axum::{Json, Router};

            use crate::auth::guard::AuthUser;
            use crate::auth::policy::{Action, Resource};
            use crate::error::ApiResult;
            use crate::models::$entity;
            use crate::models::LookupPayload;
            use crate::state::AppState;

            pub fn router() -> Router<AppState> {
                Router::new()
                    .route("/", post(create).get(list))
                    .route("/:id", get(get_one).put(update).delete(remove))
            }

            async fn create(
                State(state): State<AppState>,
                AuthUser(caller): AuthUser,
                Json(payload): Json<LookupPayload>,
            ) -> ApiResult<(StatusCode, Json<$entity>)> {
                state.policy.authorize(&caller, Resource::$resource, Action::Create)?;
                Ok((StatusCode::CREATED, Json(state.$field.create(payload).await?)))
            }

            async fn list(
                State(state): State<AppState>,
                AuthUser(caller): AuthUser,
            ) -> ApiResult<Json<Vec<$entity>>> {
                state.policy.authorize(&caller, Resource::$resource, Action::List)?;
                Ok(Json(state.$field.all().await?))
            }

            async fn get_one(
                State(state): State<AppState>,
                AuthUser(caller): AuthUser,
                Path(id): Path<String>,
            ) -> ApiResult<Json<$entity>> {
                state.policy.authorize(&caller, Resource::$resource, Action::Read)?;
                Ok(Json(state.$field.get(&id).await?))
            }

            async fn update(
                State(state): State<AppState>,
                AuthUser(caller): AuthUser,
                Path(id): Path<String>,
                Json(payload): Json<LookupPayload>,
            ) -> ApiResult<Json<$entity>> {
                state.policy.authorize(&caller, Resource::$resource, Action::Update)?;
                Ok(Json(state.$field.update(&id, payload).await?))
            }

            async fn remove(
                State(state): State<AppState>,
                AuthUser(caller): AuthUser,
                Path(id): Path<String>,
            ) -> ApiResult<Json<$entity>> {
                state.policy.authorize(&caller, Resource::$resource, Action::Delete)?;
                Ok(Json(state.$field.delete(&id).await?))
            }
        }
    };
}

lookup_routes!(categories, categories, Category, Category);
lookup_routes!(brands, brands, Brand, Brand);
lookup_routes!(colors, colors, Color, Color);
lookup_routes!(blog_categories, blog_categories, BlogCategory, BlogCategory);
