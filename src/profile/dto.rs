use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::recipes::FitnessGoal;

use super::repo_types::{Profile, ProfileUpsert};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub fitness_goal: Option<String>,
    pub lifestyle: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub privacy: bool,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ProfileRequest {
    pub fn validate(self) -> Result<ProfileUpsert, ApiError> {
        let missing = || ApiError::bad_request("Name and Email are required.");
        let name = non_blank(self.name).ok_or_else(missing)?;
        let email = non_blank(self.email)
            .map(|e| normalize_email(&e))
            .ok_or_else(missing)?;
        if !is_valid_email(&email) {
            return Err(ApiError::bad_request("Invalid email"));
        }
        let fitness_goal = match non_blank(self.fitness_goal) {
            Some(raw) => Some(
                raw.parse::<FitnessGoal>()
                    .map_err(|_| ApiError::bad_request("Unknown fitness goal."))?
                    .label()
                    .to_string(),
            ),
            None => None,
        };
        let dietary_restrictions = self
            .dietary_restrictions
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(ProfileUpsert {
            name,
            email,
            fitness_goal,
            lifestyle: non_blank(self.lifestyle),
            dietary_restrictions,
            privacy: self.privacy,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub fitness_goal: Option<String>,
    pub lifestyle: Option<String>,
    pub dietary_restrictions: Vec<String>,
    pub privacy: bool,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            fitness_goal: p.fitness_goal,
            lifestyle: p.lifestyle,
            dietary_restrictions: p
                .dietary_restrictions
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            privacy: p.privacy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("student@uwaterloo.ca"));
        assert!(!is_valid_email("student@"));
        assert!(!is_valid_email("no spaces@x.io"));
    }

    #[test]
    fn joins_dietary_restrictions_and_normalizes() {
        let req: ProfileRequest = serde_json::from_str(
            r#"{"name":"Sam","email":" Sam@Example.COM ","fitnessGoal":"muscle gain","lifestyle":"Active","dietaryRestrictions":["Vegan","Nut-Free"],"privacy":true}"#,
        )
        .unwrap();
        let p = req.validate().unwrap();
        assert_eq!(p.email, "sam@example.com");
        assert_eq!(p.fitness_goal.as_deref(), Some("Muscle Gain"));
        assert_eq!(p.dietary_restrictions, "Vegan, Nut-Free");
        assert!(p.privacy);
    }

    #[test]
    fn requires_name_and_email() {
        let req: ProfileRequest = serde_json::from_str(r#"{"name":"Sam"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "Name and Email are required.");
        let req: ProfileRequest =
            serde_json::from_str(r#"{"name":"Sam","email":"not-an-email"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "Invalid email");
    }
}
