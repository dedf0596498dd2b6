use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::meals::{Meal, NewMeal};
use crate::posts::{NewPost, Post, VoteChange, VoteResponse};

use super::api::{ClientError, MealsApi, PostsApi};

/// REST client for the `/api` routes.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

/// Maps a non-2xx reply to [`ClientError::Api`] using its `error` field.
async fn check(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let message = res
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    debug!(%status, %message, "api call rejected");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn read<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    Ok(check(res).await?.json::<T>().await?)
}

#[async_trait]
impl MealsApi for HttpApi {
    async fn list_meals(&self) -> Result<Vec<Meal>, ClientError> {
        read(self.client.get(self.url("meals")).send().await?).await
    }

    async fn create_meal(&self, meal: &NewMeal) -> Result<Meal, ClientError> {
        read(self.client.post(self.url("meals")).json(meal).send().await?).await
    }

    async fn update_meal(&self, id: Uuid, meal: &NewMeal) -> Result<Meal, ClientError> {
        let url = self.url(&format!("meals/{id}"));
        read(self.client.put(url).json(meal).send().await?).await
    }

    async fn delete_meal(&self, id: Uuid) -> Result<(), ClientError> {
        let url = self.url(&format!("meals/{id}"));
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl PostsApi for HttpApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        read(self.client.get(self.url("posts")).send().await?).await
    }

    async fn create_post(&self, post: &NewPost) -> Result<Post, ClientError> {
        read(self.client.post(self.url("posts")).json(post).send().await?).await
    }

    async fn vote(&self, id: Uuid, change: VoteChange) -> Result<i32, ClientError> {
        let url = self.url(&format!("posts/{id}/vote"));
        let body = json!({ "change": change.delta() });
        let res: VoteResponse = read(self.client.put(url).json(&body).send().await?).await?;
        Ok(res.votes)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let url = self.url(&format!("posts/{id}"));
        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}
