use sqlx::PgPool;

use super::repo_types::{Profile, ProfileUpsert};

impl Profile {
    /// Inserts or updates by email. The name is kept from the first insert.
    pub async fn upsert(db: &PgPool, p: &ProfileUpsert) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (name, email, fitness_goal, lifestyle, dietary_restrictions, privacy)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE
               SET fitness_goal = EXCLUDED.fitness_goal,
                   lifestyle = EXCLUDED.lifestyle,
                   dietary_restrictions = EXCLUDED.dietary_restrictions,
                   privacy = EXCLUDED.privacy
            RETURNING id, name, email, fitness_goal, lifestyle, dietary_restrictions, privacy, created_at
            "#,
        )
        .bind(&p.name)
        .bind(&p.email)
        .bind(&p.fitness_goal)
        .bind(&p.lifestyle)
        .bind(&p.dietary_restrictions)
        .bind(p.privacy)
        .fetch_one(db)
        .await
    }

    /// Find a profile by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, name, email, fitness_goal, lifestyle, dietary_restrictions, privacy, created_at
              FROM profiles
             WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }
}
