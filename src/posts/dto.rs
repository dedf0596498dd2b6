use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::lenient;

use super::repo_types::NewPost;
use super::services::VoteChange;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub restaurant_name: Option<String>,
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub rating: Option<i64>,
    pub restaurant_tag: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, ApiError> {
        let missing = || ApiError::bad_request("All fields are required.");
        let restaurant_name = non_blank(self.restaurant_name).ok_or_else(missing)?;
        let review_text = non_blank(self.review_text).ok_or_else(missing)?;
        let rating = self.rating.ok_or_else(missing)?;
        if !(1..=5).contains(&rating) {
            return Err(ApiError::bad_request("Rating must be between 1 and 5."));
        }
        Ok(NewPost {
            restaurant_name,
            review_text,
            rating: rating as i32,
            restaurant_tag: non_blank(self.restaurant_tag),
        })
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub change: Option<i64>,
}

impl VoteRequest {
    pub fn change(&self) -> Result<VoteChange, ApiError> {
        self.change
            .and_then(|c| VoteChange::try_from(c).ok())
            .ok_or_else(|| ApiError::bad_request("Invalid vote change."))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub success: bool,
    pub votes: i32,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: uuid::Uuid,
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_post_fields() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"restaurantName":" Lazeez ","reviewText":"Great shawarma","rating":"5","restaurantTag":""}"#,
        )
        .unwrap();
        let post = req.validate().unwrap();
        assert_eq!(post.restaurant_name, "Lazeez");
        assert_eq!(post.rating, 5);
        assert_eq!(post.restaurant_tag, None);
    }

    #[test]
    fn rejects_missing_or_out_of_range_rating() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"restaurantName":"A","reviewText":"B"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "All fields are required.");

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"restaurantName":"A","reviewText":"B","rating":9}"#).unwrap();
        assert!(matches!(req.validate(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn vote_change_must_be_plus_or_minus_one() {
        let up: VoteRequest = serde_json::from_str(r#"{"change":1}"#).unwrap();
        assert_eq!(up.change().unwrap(), VoteChange::Up);
        let down: VoteRequest = serde_json::from_str(r#"{"change":-1}"#).unwrap();
        assert_eq!(down.change().unwrap(), VoteChange::Down);
        let bad: VoteRequest = serde_json::from_str(r#"{"change":2}"#).unwrap();
        assert_eq!(bad.change().unwrap_err().to_string(), "Invalid vote change.");
        let none: VoteRequest = serde_json::from_str("{}").unwrap();
        assert!(none.change().is_err());
    }
}
