use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Recipe with its ingredients joined into one comma separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub cooking_time: String,
    pub instructions: String,
    pub fitness_goal: String,
    pub ingredients: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub title: String,
    pub cooking_time: String,
    pub instructions: String,
    pub fitness_goal: String,
    pub ingredients: Vec<String>,
}
