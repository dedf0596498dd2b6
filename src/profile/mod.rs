mod dto;
pub mod handlers;
mod repo;
mod repo_types;

pub use dto::{normalize_email, ProfileResponse};
pub use repo_types::Profile;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::profile_routes()
}
