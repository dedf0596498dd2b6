use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{normalize_email, ProfileRequest, ProfileResponse};
use super::repo_types::Profile;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", post(save_profile))
        .route("/profile/:email", get(get_profile))
}

#[instrument(skip(state, body))]
pub async fn save_profile(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ProfileRequest>,
) -> ApiResult<Json<Value>> {
    let upsert = body.validate()?;
    let profile = Profile::upsert(&state.db, &upsert).await?;
    info!(profile_id = %profile.id, "profile saved");
    Ok(Json(json!({
        "message": "Profile saved successfully",
        "profile": ProfileResponse::from(profile),
    })))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = Profile::find_by_email(&state.db, &normalize_email(&email))
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(ProfileResponse::from(profile)))
}
