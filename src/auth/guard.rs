//! Request authentication: resolves the bearer token into a [`User`] and
//! attaches it to the handler through an extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// The authenticated caller. Extracting this fails the request with
/// `Unauthorized` when the header is missing, the token does not verify, or
/// the referenced user no longer exists.
pub struct AuthUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("no token attached to the header"))?;

        let user_id = state.credentials.verify_token(token)?;
        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("user for this token no longer exists"))?;

        Ok(Self(user))
    }
}
