use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::lenient;

use super::repo_types::AnalysisRecord;
use super::services::{time_ago, FoodAnalysis, WrapStatistics};

/// Scans are replayed as JPEG regardless of the uploaded type.
const STORED_IMAGE_TYPE: &str = "image/jpeg";

pub const DEFAULT_RECENT_LIMIT: i64 = 10;
pub const MAX_RECENT_LIMIT: i64 = 100;
pub const DEFAULT_WRAP_DAYS: i64 = 30;
pub const MAX_WRAP_DAYS: i64 = 365;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub analysis: FoodAnalysis,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub limit: Option<i64>,
}

impl RecentQuery {
    pub fn limit(&self) -> i64 {
        match self.limit {
            Some(n) if n > 0 => n.min(MAX_RECENT_LIMIT),
            _ => DEFAULT_RECENT_LIMIT,
        }
    }
}

/// History entry shaped for the scan list.
#[derive(Debug, Serialize)]
pub struct RecentAnalysis {
    pub id: Uuid,
    pub name: String,
    pub calories: Option<i32>,
    pub nutrition: Option<String>,
    pub quality: Option<String>,
    pub image: Option<String>,
    pub timestamp: String,
}

impl RecentAnalysis {
    pub fn from_record(r: AnalysisRecord, now: OffsetDateTime) -> Self {
        Self {
            id: r.id,
            timestamp: time_ago(r.created_at, now),
            image: r
                .image_data
                .map(|b64| format!("data:{STORED_IMAGE_TYPE};base64,{b64}")),
            name: r.fruit_name,
            calories: r.calories,
            nutrition: r.nutrition_highlights,
            quality: r.freshness_state,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WrapQuery {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub days: Option<i64>,
}

impl WrapQuery {
    pub fn days(&self) -> i64 {
        match self.days {
            Some(n) if n > 0 => n.min(MAX_WRAP_DAYS),
            _ => DEFAULT_WRAP_DAYS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WrapResponse {
    pub period: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    #[serde(flatten)]
    pub stats: WrapStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_fall_back_to_defaults() {
        assert_eq!(RecentQuery { limit: None }.limit(), 10);
        assert_eq!(RecentQuery { limit: Some(0) }.limit(), 10);
        assert_eq!(RecentQuery { limit: Some(3) }.limit(), 3);
        assert_eq!(RecentQuery { limit: Some(5000) }.limit(), MAX_RECENT_LIMIT);
        assert_eq!(WrapQuery { days: None }.days(), 30);
        assert_eq!(WrapQuery { days: Some(7) }.days(), 7);
    }

    #[test]
    fn response_flattens_analysis() {
        let res = AnalysisResponse {
            id: Uuid::nil(),
            analysis: FoodAnalysis::fallback("plain text"),
        };
        let v = serde_json::to_value(&res).unwrap();
        assert_eq!(v["id"], Uuid::nil().to_string());
        assert_eq!(v["fruit_name"], "Food Item");
        assert_eq!(v["freshness_state"], "Unknown");
        assert_eq!(v["raw_analysis"], "plain text");
    }
}
