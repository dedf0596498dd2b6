use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{debug, info, instrument};

use crate::{error::ApiResult, extract::ApiJson, state::AppState};

use super::dto::{CreateRecipeRequest, CreatedRecipeResponse};
use super::repo_types::Recipe;
use super::services::{FitnessGoal, RecipeFilter};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route("/recipes/goals", get(list_goals))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(filter): Query<RecipeFilter>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let all = Recipe::list_with_ingredients(&state.db).await?;
    let total = all.len();
    let recipes = filter.apply(all);
    debug!(total, kept = recipes.len(), "recipes filtered");
    Ok(Json(recipes))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateRecipeRequest>,
) -> ApiResult<(StatusCode, Json<CreatedRecipeResponse>)> {
    let recipe = body.validate()?;
    let id = Recipe::create(&state.db, &recipe).await?;
    info!(recipe_id = %id, ingredients = recipe.ingredients.len(), "recipe added");
    Ok((
        StatusCode::CREATED,
        Json(CreatedRecipeResponse {
            message: "Recipe added successfully!",
            id,
        }),
    ))
}

pub async fn list_goals() -> Json<[FitnessGoal; 3]> {
    Json(FitnessGoal::ALL)
}
