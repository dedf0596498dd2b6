use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ApiResult},
    profile::{Profile, ProfileResponse},
    state::AppState,
};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

/// Profile of the signed-in user, matched by the email claim of the token.
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let email = user
        .email
        .as_deref()
        .map(crate::profile::normalize_email)
        .ok_or_else(|| ApiError::Unauthorized("Token has no email claim".into()))?;
    let profile = Profile::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(ProfileResponse::from(profile)))
}
