use axum::{
    extract::{Multipart, Query, State},
    routing::{get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, instrument, warn};

use crate::{
    ai::encode_base64,
    error::{ApiError, ApiResult},
    state::AppState,
    upload::read_file_field,
};

use super::dto::{AnalysisResponse, RecentAnalysis, RecentQuery, WrapQuery, WrapResponse};
use super::repo_types::AnalysisRecord;
use super::services::{parse_analysis, wrap_statistics, ANALYSIS_PROMPT};

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_food))
        .route("/analyses/recent", get(recent_analyses))
        .route("/analyses/wrap", get(analysis_wrap))
}

/// POST /analyze (multipart, field `image`)
#[instrument(skip(state, mp))]
pub async fn analyze_food(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> ApiResult<Json<AnalysisResponse>> {
    let image = read_file_field(&mut mp, "image")
        .await?
        .ok_or_else(|| ApiError::bad_request("No image file provided"))?;
    if image.body.is_empty() {
        return Err(ApiError::bad_request("No image file selected"));
    }
    if !state.vision.is_configured() {
        return Err(ApiError::upstream(
            "GROQ_API_KEY not configured",
            anyhow::anyhow!("vision client has no api key"),
        ));
    }

    info!(filename = %image.filename, bytes = image.body.len(), "analyzing image");
    let reply = state
        .vision
        .describe_image(ANALYSIS_PROMPT, image.body.clone(), &image.content_type)
        .await
        .map_err(|e| ApiError::upstream("Analysis failed", e))?;
    debug!(reply = %reply.chars().take(200).collect::<String>(), "vision reply");

    let analysis = parse_analysis(&reply);
    if analysis.raw_analysis.is_some() {
        warn!("vision reply had no JSON; stored fallback analysis");
    }

    let filename = (!image.filename.is_empty()).then_some(image.filename.as_str());
    let id = AnalysisRecord::insert(&state.db, &analysis, filename, &encode_base64(&image.body)).await?;
    info!(%id, food = %analysis.fruit_name, "analysis stored");
    Ok(Json(AnalysisResponse { id, analysis }))
}

#[instrument(skip(state))]
pub async fn recent_analyses(
    State(state): State<AppState>,
    Query(q): Query<RecentQuery>,
) -> ApiResult<Json<Vec<RecentAnalysis>>> {
    let rows = AnalysisRecord::recent(&state.db, q.limit()).await?;
    let now = OffsetDateTime::now_utc();
    Ok(Json(
        rows.into_iter()
            .map(|r| RecentAnalysis::from_record(r, now))
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn analysis_wrap(
    State(state): State<AppState>,
    Query(q): Query<WrapQuery>,
) -> ApiResult<Json<WrapResponse>> {
    let days = q.days();
    let end_date = OffsetDateTime::now_utc();
    let start_date = end_date - Duration::days(days);
    let rows = AnalysisRecord::since(&state.db, start_date).await?;
    if rows.is_empty() {
        return Err(ApiError::not_found("No food scans found for this period"));
    }
    Ok(Json(WrapResponse {
        period: format!("{days} days"),
        start_date,
        end_date,
        stats: wrap_statistics(&rows),
    }))
}
