use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Meal, NewMeal};

const MEAL_COLUMNS: &str = "id, name, calories, protein, carbs, fats, date, created_at";

impl Meal {
    /// All meals, newest date first.
    pub async fn list_all(db: &PgPool) -> Result<Vec<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals ORDER BY date DESC, created_at DESC"
        ))
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &PgPool, meal: &NewMeal) -> Result<Meal, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            r#"
            INSERT INTO meals (name, calories, protein, carbs, fats, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(&meal.name)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.carbs)
        .bind(meal.fats)
        .bind(meal.date)
        .fetch_one(db)
        .await
    }

    /// Overwrites every field; `None` when the meal does not exist.
    pub async fn update(db: &PgPool, id: Uuid, meal: &NewMeal) -> Result<Option<Meal>, sqlx::Error> {
        sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals
               SET name = $1, calories = $2, protein = $3, carbs = $4, fats = $5, date = $6
             WHERE id = $7
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(&meal.name)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.carbs)
        .bind(meal.fats)
        .bind(meal.date)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
