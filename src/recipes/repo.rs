use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewRecipe, Recipe};

impl Recipe {
    /// Every recipe with `string_agg` of its ingredients in insertion order.
    pub async fn list_with_ingredients(db: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT r.id,
                   r.title,
                   r.cooking_time,
                   r.instructions,
                   r.fitness_goal,
                   r.created_at,
                   COALESCE(string_agg(i.name, ', ' ORDER BY i.id), '') AS ingredients
              FROM recipes r
              LEFT JOIN ingredients i ON i.recipe_id = r.id
             GROUP BY r.id
             ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Inserts the recipe and its ingredient rows in one transaction.
    pub async fn create(db: &PgPool, recipe: &NewRecipe) -> Result<Uuid, sqlx::Error> {
        let mut tx = db.begin().await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO recipes (title, cooking_time, instructions, fitness_goal)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.cooking_time)
        .bind(&recipe.instructions)
        .bind(&recipe.fitness_goal)
        .fetch_one(&mut *tx)
        .await?;

        for name in &recipe.ingredients {
            sqlx::query("INSERT INTO ingredients (recipe_id, name) VALUES ($1, $2)")
                .bind(id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }
}
