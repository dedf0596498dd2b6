use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Comment, NewPost, Post};

const POST_COLUMNS: &str =
    "id, restaurant_name, review_text, rating, restaurant_tag, votes, created_at";

impl Post {
    pub async fn create(db: &PgPool, post: &NewPost) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (restaurant_name, review_text, rating, restaurant_tag, votes)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(&post.restaurant_name)
        .bind(&post.review_text)
        .bind(post.rating)
        .bind(&post.restaurant_tag)
        .fetch_one(db)
        .await
    }

    /// All posts, most voted first.
    pub async fn list_by_votes(db: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY votes DESC, created_at DESC"
        ))
        .fetch_all(db)
        .await
    }

    /// Relative vote update; returns the new count or `None` for an unknown post.
    pub async fn apply_vote(db: &PgPool, id: Uuid, change: i32) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "UPDATE posts SET votes = votes + $1 WHERE id = $2 RETURNING votes",
        )
        .bind(change)
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn exists(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(db)
            .await
    }

    pub async fn report(db: &PgPool, id: Uuid, reason: &str) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO post_reports (post_id, reason) VALUES ($1, $2) RETURNING id",
        )
        .bind(id)
        .bind(reason)
        .fetch_one(db)
        .await
    }
}

impl Comment {
    /// Comments of a post, oldest first.
    pub async fn list_for_post(db: &PgPool, post_id: Uuid) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, text, created_at
              FROM comments
             WHERE post_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &PgPool, post_id: Uuid, text: &str) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, text)
            VALUES ($1, $2)
            RETURNING id, post_id, text, created_at
            "#,
        )
        .bind(post_id)
        .bind(text)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
