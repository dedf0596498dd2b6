use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::{Date, Duration, OffsetDateTime};
use tracing::warn;

use crate::lenient;

use super::repo_types::AnalysisRecord;

pub const ANALYSIS_PROMPT: &str = r#"Analyze this food image and provide a JSON response with the following structure:

{
  "fruit_name": "Name of the food item",
  "freshness_level": 8,
  "freshness_state": "Fresh/Ripe/Overripe/Spoiled",
  "visual_indicators": "Description of color, texture, blemishes",
  "should_buy": true,
  "best_use": "Eat now/Wait a few days/Use for cooking/Avoid",
  "shelf_life_days": 3,
  "calories": 105,
  "nutrition_highlights": "Key vitamins and minerals",
  "health_benefits": "Notable health benefits",
  "purchase_recommendation": "Buy/Skip with reasoning",
  "storage_method": "Best storage method after purchase",
  "food_pun": "A short, friendly pun about this food"
}

IMPORTANT: Respond ONLY with valid JSON. Do not include any text before or after the JSON object."#;

const DEFAULT_FOOD_NAME: &str = "Food Item";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FreshnessState {
    Fresh,
    Ripe,
    Overripe,
    Spoiled,
    #[default]
    Unknown,
}

impl FreshnessState {
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessState::Fresh => "Fresh",
            FreshnessState::Ripe => "Ripe",
            FreshnessState::Overripe => "Overripe",
            FreshnessState::Spoiled => "Spoiled",
            FreshnessState::Unknown => "Unknown",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().replace(['-', ' '], "").as_str() {
            "fresh" => FreshnessState::Fresh,
            "ripe" => FreshnessState::Ripe,
            "overripe" => FreshnessState::Overripe,
            "spoiled" | "rotten" => FreshnessState::Spoiled,
            _ => FreshnessState::Unknown,
        }
    }
}

fn freshness_state<'de, D>(de: D) -> Result<FreshnessState, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => FreshnessState::parse(&s),
        _ => FreshnessState::Unknown,
    })
}

/// Text that the model sometimes sends as a list of strings.
fn opt_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return Ok(None),
    };
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// The vision model's JSON reply, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModelReply {
    #[serde(deserialize_with = "opt_text")]
    fruit_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_i32_rounded")]
    freshness_level: Option<i32>,
    #[serde(deserialize_with = "freshness_state")]
    freshness_state: FreshnessState,
    #[serde(deserialize_with = "opt_text")]
    visual_indicators: Option<String>,
    #[serde(deserialize_with = "lenient::opt_bool")]
    should_buy: Option<bool>,
    #[serde(deserialize_with = "opt_text")]
    best_use: Option<String>,
    #[serde(deserialize_with = "lenient::opt_i32_rounded")]
    shelf_life_days: Option<i32>,
    #[serde(deserialize_with = "lenient::opt_i32_rounded")]
    calories: Option<i32>,
    #[serde(deserialize_with = "opt_text")]
    nutrition_highlights: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    health_benefits: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    purchase_recommendation: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    storage_method: Option<String>,
    #[serde(deserialize_with = "opt_text")]
    food_pun: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodAnalysis {
    pub fruit_name: String,
    pub freshness_level: Option<i32>,
    pub freshness_state: FreshnessState,
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
    /// Model text that could not be read as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
}

impl From<ModelReply> for FoodAnalysis {
    fn from(r: ModelReply) -> Self {
        Self {
            fruit_name: r.fruit_name.unwrap_or_else(|| DEFAULT_FOOD_NAME.into()),
            freshness_level: r.freshness_level.map(|l| l.clamp(1, 10)),
            freshness_state: r.freshness_state,
            visual_indicators: r.visual_indicators,
            should_buy: r.should_buy,
            best_use: r.best_use,
            shelf_life_days: r.shelf_life_days.map(|d| d.max(0)),
            calories: r.calories.map(|c| c.max(0)),
            nutrition_highlights: r.nutrition_highlights,
            health_benefits: r.health_benefits,
            purchase_recommendation: r.purchase_recommendation,
            storage_method: r.storage_method,
            food_pun: r.food_pun,
            raw_analysis: None,
        }
    }
}

impl FoodAnalysis {
    /// Placeholder record used when the reply holds no readable JSON.
    pub fn fallback(raw: &str) -> Self {
        Self {
            fruit_name: DEFAULT_FOOD_NAME.into(),
            freshness_level: Some(7),
            freshness_state: FreshnessState::Unknown,
            visual_indicators: Some("Standard quality assessment".into()),
            should_buy: Some(true),
            best_use: Some("Eat now".into()),
            shelf_life_days: Some(3),
            calories: Some(100),
            nutrition_highlights: Some("Nutritional analysis complete".into()),
            health_benefits: Some("Good source of nutrients".into()),
            purchase_recommendation: Some("Analysis provided".into()),
            storage_method: Some("Store in cool, dry place".into()),
            food_pun: None,
            raw_analysis: Some(raw.to_string()),
        }
    }
}

fn json_candidate(reply: &str) -> Option<&str> {
    if reply.starts_with('{') && reply.ends_with('}') {
        return Some(reply);
    }
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => Some(&reply[start..=end]),
        _ => None,
    }
}

/// Reads the model reply as strict JSON, then as JSON embedded in prose, else falls back.
pub fn parse_analysis(reply: &str) -> FoodAnalysis {
    let reply = reply.trim();
    json_candidate(reply)
        .and_then(|json| {
            serde_json::from_str::<ModelReply>(json)
                .map_err(|e| warn!(error = %e, "vision reply is not valid JSON"))
                .ok()
        })
        .map(FoodAnalysis::from)
        .unwrap_or_else(|| FoodAnalysis::fallback(reply))
}

/// "N days ago" / "N hours ago" / "N minutes ago", truncating.
pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let minutes = (now - then).whole_minutes().max(0);
    let hours = minutes / 60;
    let days = hours / 24;
    if days > 0 {
        format!("{days} days ago")
    } else if hours > 0 {
        format!("{hours} hours ago")
    } else {
        format!("{minutes} minutes ago")
    }
}

const FRUIT_KEYWORDS: &[&str] = &[
    "apple", "banana", "orange", "grape", "berry", "peach", "pear", "mango", "kiwi", "melon",
    "cherry", "plum", "pineapple",
];
const VEGETABLE_KEYWORDS: &[&str] = &[
    "carrot", "broccoli", "tomato", "cucumber", "lettuce", "spinach", "onion", "garlic", "potato",
    "pepper", "corn",
];

/// Hour reported when there are no scans to look at.
const DEFAULT_PEAK_HOUR: u8 = 12;
const FOOD_FREQUENCY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FoodCategories {
    pub fruits: usize,
    pub vegetables: usize,
    pub other: usize,
}

impl FoodCategories {
    fn count(&mut self, name: &str) {
        let name = name.to_lowercase();
        if FRUIT_KEYWORDS.iter().any(|k| name.contains(k)) {
            self.fruits += 1;
        } else if VEGETABLE_KEYWORDS.iter().any(|k| name.contains(k)) {
            self.vegetables += 1;
        } else {
            self.other += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrapStatistics {
    pub total_scans: usize,
    pub unique_foods: usize,
    pub top_food: FoodCount,
    pub total_calories: i64,
    pub avg_calories: f64,
    pub avg_freshness: f64,
    pub buy_ratio: f64,
    pub peak_hour: u8,
    pub consecutive_days: usize,
    pub food_categories: FoodCategories,
    pub puns_received: usize,
    pub food_frequency: Vec<FoodCount>,
}

/// Counts in first-seen order, then stably sorted by count descending.
fn most_common<T: PartialEq + Clone>(items: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(k, _)| *k == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn mean(values: &[i32]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
    }
}

/// Longest run of consecutive calendar days (UTC) with at least one scan.
pub fn longest_streak(timestamps: impl IntoIterator<Item = OffsetDateTime>) -> usize {
    let days: BTreeSet<Date> = timestamps.into_iter().map(|t| t.date()).collect();
    let mut best = 0;
    let mut current = 0;
    let mut prev: Option<Date> = None;
    for day in days {
        current = match prev {
            Some(p) if day - p == Duration::days(1) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        prev = Some(day);
    }
    best
}

/// Aggregates for the scan wrap; `records` is expected newest first.
pub fn wrap_statistics(records: &[AnalysisRecord]) -> WrapStatistics {
    let total_scans = records.len();
    let names: Vec<&str> = records.iter().map(|r| r.fruit_name.as_str()).collect();
    let frequency = most_common(names.iter().copied());

    let top_food = frequency
        .first()
        .map(|(name, count)| FoodCount {
            name: name.to_string(),
            count: *count,
        })
        .unwrap_or_else(|| FoodCount {
            name: "No data".into(),
            count: 0,
        });

    // zero readings count as missing
    let calories: Vec<i32> = records
        .iter()
        .filter_map(|r| r.calories)
        .filter(|&c| c != 0)
        .collect();
    let freshness: Vec<i32> = records
        .iter()
        .filter_map(|r| r.freshness_level)
        .filter(|&l| l != 0)
        .collect();

    let buy_count = records.iter().filter(|r| r.should_buy == Some(true)).count();
    let buy_ratio = if total_scans > 0 {
        buy_count as f64 / total_scans as f64 * 100.0
    } else {
        0.0
    };

    let peak_hour = most_common(records.iter().map(|r| r.created_at.hour()))
        .first()
        .map(|(h, _)| *h)
        .unwrap_or(DEFAULT_PEAK_HOUR);

    let mut food_categories = FoodCategories::default();
    for name in &names {
        food_categories.count(name);
    }

    WrapStatistics {
        total_scans,
        unique_foods: names.iter().collect::<BTreeSet<_>>().len(),
        top_food,
        total_calories: calories.iter().map(|&c| i64::from(c)).sum(),
        avg_calories: round1(mean(&calories)),
        avg_freshness: round1(mean(&freshness)),
        buy_ratio: round1(buy_ratio),
        peak_hour,
        consecutive_days: longest_streak(records.iter().map(|r| r.created_at)),
        food_categories,
        puns_received: records
            .iter()
            .filter(|r| r.food_pun.as_deref().is_some_and(|p| !p.trim().is_empty()))
            .count(),
        food_frequency: frequency
            .into_iter()
            .take(FOOD_FREQUENCY_LIMIT)
            .map(|(name, count)| FoodCount {
                name: name.to_string(),
                count,
            })
            .collect(),
    }
}
