mod dto;
pub mod handlers;
mod repo;
mod repo_types;
mod services;

pub use repo_types::Recipe;
pub use services::{FitnessGoal, RecipeFilter};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::recipe_routes()
}
