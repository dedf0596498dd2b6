mod dto;
pub mod handlers;
mod repo;
mod repo_types;
mod services;

pub use dto::VoteResponse;
pub use repo_types::{NewPost, Post};
pub use services::VoteChange;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::post_routes()
}
