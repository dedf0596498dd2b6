//! Framework-independent view models for the web client.
//!
//! Every mutation waits for the server and then patches local state with the row the
//! server confirmed; `refresh` replaces the whole list.

mod api;
mod board;
mod http;
mod tracker;

#[cfg(test)]
mod fake;

pub use api::{ClientError, MealsApi, PostsApi};
pub use board::{CommunityBoard, PostFilter};
pub use http::HttpApi;
pub use tracker::{DietTracker, MealDraft, SubmitOutcome, UNDO_WINDOW};
