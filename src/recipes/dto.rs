use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

use super::repo_types::NewRecipe;
use super::services::{parse_ingredients, FitnessGoal};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IngredientList {
    Csv(String),
    Items(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub cooking_time: Option<String>,
    pub instructions: Option<String>,
    pub fitness_goal: Option<String>,
    pub ingredients: Option<IngredientList>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl CreateRecipeRequest {
    pub fn validate(self) -> Result<NewRecipe, ApiError> {
        let missing = || ApiError::bad_request("All fields are required.");
        let title = non_blank(self.title).ok_or_else(missing)?;
        let cooking_time = non_blank(self.cooking_time).ok_or_else(missing)?;
        let instructions = non_blank(self.instructions).ok_or_else(missing)?;
        let goal_raw = non_blank(self.fitness_goal).ok_or_else(missing)?;
        let goal: FitnessGoal = goal_raw
            .parse()
            .map_err(|_| ApiError::bad_request("Unknown fitness goal."))?;
        let ingredients = match self.ingredients.ok_or_else(missing)? {
            IngredientList::Csv(csv) if csv.trim().is_empty() => return Err(missing()),
            IngredientList::Csv(csv) => parse_ingredients(&csv),
            IngredientList::Items(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        };
        Ok(NewRecipe {
            title,
            cooking_time,
            instructions,
            fitness_goal: goal.label().to_string(),
            ingredients,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedRecipeResponse {
    pub message: &'static str,
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_csv_or_list_ingredients() {
        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Oat bowl","cooking_time":"5 min","instructions":"Mix.","fitness_goal":"weight loss","ingredients":"oats, milk,banana"}"#,
        )
        .unwrap();
        let recipe = req.validate().unwrap();
        assert_eq!(recipe.fitness_goal, "Weight Loss");
        assert_eq!(recipe.ingredients, vec!["oats", "milk", "banana"]);

        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Eggs","cooking_time":"5","instructions":"Fry.","fitness_goal":"Muscle Gain","ingredients":["eggs"," butter "]}"#,
        )
        .unwrap();
        assert_eq!(req.validate().unwrap().ingredients, vec!["eggs", "butter"]);
    }

    #[test]
    fn rejects_missing_fields_and_unknown_goal() {
        let req: CreateRecipeRequest =
            serde_json::from_str(r#"{"title":"Oat bowl","ingredients":"oats"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "All fields are required.");

        let req: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"X","cooking_time":"1","instructions":"Y","fitness_goal":"bulk","ingredients":"a"}"#,
        )
        .unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "Unknown fitness goal.");
    }
}
