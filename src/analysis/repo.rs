use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::AnalysisRecord;
use super::services::FoodAnalysis;

const ANALYSIS_COLUMNS: &str = r#"
    id, fruit_name, freshness_level, freshness_state, visual_indicators, should_buy,
    best_use, shelf_life_days, calories, nutrition_highlights, health_benefits,
    purchase_recommendation, storage_method, food_pun, image_filename, image_data, raw_analysis,
    created_at
"#;

const INSERT_ANALYSIS: &str = r#"
    INSERT INTO food_analyses (
        fruit_name, freshness_level, freshness_state, visual_indicators,
        should_buy, best_use, shelf_life_days, calories, nutrition_highlights,
        health_benefits, purchase_recommendation, storage_method, food_pun,
        image_filename, image_data, raw_analysis
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    RETURNING id
"#;

impl AnalysisRecord {
    pub async fn insert(
        db: &PgPool,
        analysis: &FoodAnalysis,
        image_filename: Option<&str>,
        image_b64: &str,
    ) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(INSERT_ANALYSIS)
            .bind(&analysis.fruit_name)
            .bind(analysis.freshness_level)
            .bind(analysis.freshness_state.label())
            .bind(&analysis.visual_indicators)
            .bind(analysis.should_buy)
            .bind(&analysis.best_use)
            .bind(analysis.shelf_life_days)
            .bind(analysis.calories)
            .bind(&analysis.nutrition_highlights)
            .bind(&analysis.health_benefits)
            .bind(&analysis.purchase_recommendation)
            .bind(&analysis.storage_method)
            .bind(&analysis.food_pun)
            .bind(image_filename)
            .bind(image_b64)
            .bind(&analysis.raw_analysis)
            .fetch_one(db)
            .await
    }

    pub async fn recent(db: &PgPool, limit: i64) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRecord>(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM food_analyses ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(db)
        .await
    }

    /// Scans made at or after `since`, newest first.
    pub async fn since(db: &PgPool, since: OffsetDateTime) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
        sqlx::query_as::<_, AnalysisRecord>(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM food_analyses WHERE created_at >= $1 ORDER BY created_at DESC"
        ))
        .bind(since)
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_list(sql: &str) -> Vec<&str> {
        let open = sql.find('(').unwrap();
        let close = sql.find(')').unwrap();
        sql[open + 1..close].split(',').map(str::trim).collect()
    }

    #[test]
    fn insert_persists_raw_reply() {
        let columns = column_list(INSERT_ANALYSIS);
        assert_eq!(columns.last(), Some(&"raw_analysis"));
        assert_eq!(columns.len(), 16);
        assert!(INSERT_ANALYSIS.contains("$16)"));
        assert!(!INSERT_ANALYSIS.contains("$17"));
    }

    #[test]
    fn selects_every_record_field() {
        let columns: Vec<&str> = ANALYSIS_COLUMNS.split(',').map(str::trim).collect();
        assert_eq!(columns.len(), 18);
        assert!(columns.contains(&"raw_analysis"));
        assert!(columns.contains(&"created_at"));
    }
}
