use crate::state::AppState;
use axum::Router;

mod claims;
pub mod extractors;
pub mod handlers;
pub mod services;

pub use extractors::AuthUser;
pub use services::TokenVerifier;

pub fn router() -> Router<AppState> {
    handlers::me_routes()
}
