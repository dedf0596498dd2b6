use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Profile row; dietary restrictions are stored comma joined.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub fitness_goal: Option<String>,
    pub lifestyle: Option<String>,
    pub dietary_restrictions: String,
    pub privacy: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpsert {
    pub name: String,
    pub email: String,
    pub fitness_goal: Option<String>,
    pub lifestyle: Option<String>,
    pub dietary_restrictions: String,
    pub privacy: bool,
}
