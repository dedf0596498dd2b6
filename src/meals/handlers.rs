use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    nutrition::{self, MacroInput, MacroTotals},
    state::AppState,
};

use super::dto::{
    AssessRequest, AssessResponse, MealRequest, MealResponse, SummaryQuery, SummaryResponse,
};
use super::repo_types::Meal;

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id", put(update_meal).delete(delete_meal))
        .route("/meals/assess", post(assess_meal))
        .route("/meals/summary", get(meal_summary))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> ApiResult<Json<Vec<Meal>>> {
    Ok(Json(Meal::list_all(&state.db).await?))
}

#[instrument(skip(state, body))]
pub async fn create_meal(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MealRequest>,
) -> ApiResult<(StatusCode, Json<MealResponse>)> {
    let new_meal = body.validate()?;
    let meal = Meal::create(&state.db, &new_meal).await?;
    info!(meal_id = %meal.id, calories = meal.calories, "meal logged");
    Ok((StatusCode::CREATED, Json(MealResponse::from(meal))))
}

#[instrument(skip(state, body))]
pub async fn update_meal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<MealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let new_meal = body.validate()?;
    let meal = Meal::update(&state.db, id, &new_meal).await?.ok_or_else(|| {
        warn!(%id, "update of unknown meal");
        ApiError::not_found("Meal not found")
    })?;
    Ok(Json(MealResponse::from(meal)))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    if !Meal::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Meal not found"));
    }
    info!(%id, "meal deleted");
    Ok(Json(json!({ "success": true })))
}

/// Computes calories and the unhealthy-meal warning without saving anything.
#[instrument(skip(body))]
pub async fn assess_meal(ApiJson(body): ApiJson<AssessRequest>) -> Json<AssessResponse> {
    let protein = body.protein.unwrap_or(0.0);
    let carbs = body.carbs.unwrap_or(0.0);
    let fats = body.fats.unwrap_or(0.0);
    let mut input = MacroInput::from_macros(protein, carbs, fats);
    if let Some(kcal) = body.calories {
        input.calories = kcal;
    }
    let warning = nutrition::classify_meal(&input);
    Json(AssessResponse::new(input.calories.round() as i32, warning))
}

#[instrument(skip(state))]
pub async fn meal_summary(
    State(state): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let meals = Meal::list_all(&state.db).await?;
    Ok(Json(SummaryResponse {
        period: q.period,
        totals: MacroTotals::from_meals(&meals),
        buckets: nutrition::summarize(&meals, q.period),
        protein_achievement: nutrition::protein_achievement(&meals),
    }))
}
