use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::meals::{Meal, NewMeal};
use crate::posts::{NewPost, Post, VoteChange};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-2xx status.
    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no item with id {0} in the current list")]
    UnknownItem(Uuid),
}

#[async_trait]
pub trait MealsApi: Send + Sync {
    async fn list_meals(&self) -> Result<Vec<Meal>, ClientError>;
    async fn create_meal(&self, meal: &NewMeal) -> Result<Meal, ClientError>;
    async fn update_meal(&self, id: Uuid, meal: &NewMeal) -> Result<Meal, ClientError>;
    async fn delete_meal(&self, id: Uuid) -> Result<(), ClientError>;
}

#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError>;
    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError>;
    /// Returns the vote count the server holds after applying `change`.
    async fn vote(&self, id: Uuid, change: VoteChange) -> Result<i32, ClientError>;
    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError>;
}
