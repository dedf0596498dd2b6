use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

use super::dto::{
    non_blank, CommentRequest, CreatePostRequest, ReportRequest, ReportResponse, VoteRequest,
    VoteResponse,
};
use super::repo_types::{Comment, Post};
use super::services::{rank_restaurants, RestaurantRating, DEFAULT_REPORT_REASON};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/top-restaurants", get(top_restaurants))
        .route("/posts/:id", delete(delete_post))
        .route("/posts/:id/vote", put(vote_post))
        .route("/posts/:id/report", post(report_post))
        .route("/posts/:id/comments", get(list_comments).post(create_comment))
        .route("/comments/:id", delete(delete_comment))
}

#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let new_post = body.validate()?;
    let post = Post::create(&state.db, &new_post).await?;
    info!(post_id = %post.id, restaurant = %post.restaurant_name, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<Post>>> {
    Ok(Json(Post::list_by_votes(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn top_restaurants(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RestaurantRating>>> {
    let posts = Post::list_by_votes(&state.db).await?;
    Ok(Json(rank_restaurants(&posts)))
}

#[instrument(skip(state, body))]
pub async fn vote_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<VoteRequest>,
) -> ApiResult<Json<VoteResponse>> {
    let change = body.change()?;
    let votes = Post::apply_vote(&state.db, id, change.delta())
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    info!(post_id = %id, ?change, votes, "vote applied");
    Ok(Json(VoteResponse {
        success: true,
        votes,
    }))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    if !Post::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    info!(post_id = %id, "post deleted");
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(state, body))]
pub async fn report_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    body: Option<Json<ReportRequest>>,
) -> ApiResult<(StatusCode, Json<ReportResponse>)> {
    let reason = body
        .and_then(|Json(b)| non_blank(b.reason))
        .unwrap_or_else(|| DEFAULT_REPORT_REASON.to_string());
    if !Post::exists(&state.db, id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    let report_id = Post::report(&state.db, id, &reason).await?;
    warn!(post_id = %id, %reason, "post reported");
    Ok((
        StatusCode::CREATED,
        Json(ReportResponse {
            id: report_id,
            message: "Post has been reported for review.",
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(Comment::list_for_post(&state.db, id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let text = non_blank(body.text).ok_or_else(|| ApiError::bad_request("Comment cannot be empty"))?;
    if !Post::exists(&state.db, id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    let comment = Comment::create(&state.db, id, &text).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    if !Comment::delete(&state.db, id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }
    Ok(Json(json!({ "success": true })))
}
