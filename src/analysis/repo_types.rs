use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Stored result of one food photo analysis.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub fruit_name: String,
    pub freshness_level: Option<i32>,
    pub freshness_state: Option<String>,
    pub visual_indicators: Option<String>,
    pub should_buy: Option<bool>,
    pub best_use: Option<String>,
    pub shelf_life_days: Option<i32>,
    pub calories: Option<i32>,
    pub nutrition_highlights: Option<String>,
    pub health_benefits: Option<String>,
    pub purchase_recommendation: Option<String>,
    pub storage_method: Option<String>,
    pub food_pun: Option<String>,
    pub image_filename: Option<String>,
    #[serde(skip_serializing)]
    pub image_data: Option<String>, // raw base64
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
