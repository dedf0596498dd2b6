use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::repo_types::Recipe;

/// Goal used to tag profiles and recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    ImproveStamina,
}

impl FitnessGoal {
    pub const ALL: [FitnessGoal; 3] = [
        FitnessGoal::WeightLoss,
        FitnessGoal::MuscleGain,
        FitnessGoal::ImproveStamina,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::MuscleGain => "Muscle Gain",
            FitnessGoal::ImproveStamina => "Improve Stamina",
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFitnessGoal(pub String);

impl fmt::Display for UnknownFitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fitness goal {:?}", self.0)
    }
}

impl std::error::Error for UnknownFitnessGoal {}

impl FromStr for FitnessGoal {
    type Err = UnknownFitnessGoal;

    /// Case-insensitive; spaces, dashes and underscores are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match norm.as_str() {
            "weightloss" => Ok(FitnessGoal::WeightLoss),
            "musclegain" => Ok(FitnessGoal::MuscleGain),
            "improvestamina" | "improvedstamina" => Ok(FitnessGoal::ImproveStamina),
            _ => Err(UnknownFitnessGoal(s.to_string())),
        }
    }
}

impl Serialize for FitnessGoal {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FitnessGoal {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Splits a comma separated ingredient list, dropping blanks.
pub fn parse_ingredients(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Query filters of `GET /api/recipes`; blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFilter {
    pub fitness_goal: Option<String>,
    /// Excludes recipes whose ingredients mention this text.
    pub allergy: Option<String>,
    /// Keeps only recipes whose ingredients mention this text.
    pub ingredient: Option<String>,
}

fn needle(v: &Option<String>) -> Option<String> {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let ingredients = recipe.ingredients.to_lowercase();
        if let Some(goal) = needle(&self.fitness_goal) {
            if recipe.fitness_goal.trim().to_lowercase() != goal {
                return false;
            }
        }
        if let Some(allergen) = needle(&self.allergy) {
            if ingredients.contains(&allergen) {
                return false;
            }
        }
        if let Some(wanted) = needle(&self.ingredient) {
            if !ingredients.contains(&wanted) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, recipes: Vec<Recipe>) -> Vec<Recipe> {
        recipes.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn recipe(title: &str, goal: &str, ingredients: &str) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            title: title.into(),
            cooking_time: "20 min".into(),
            instructions: "Cook it.".into(),
            fitness_goal: goal.into(),
            ingredients: ingredients.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn sample() -> Vec<Recipe> {
        vec![
            recipe("Peanut noodles", "Muscle Gain", "noodles, Peanut Butter, soy sauce"),
            recipe("Oat bowl", "weight loss", "oats, milk, banana"),
            recipe("Egg wrap", "WEIGHT LOSS", "eggs, tortilla, spinach"),
            recipe("Plain rice", "Improve Stamina", ""),
        ]
    }

    fn titles(rs: &[Recipe]) -> Vec<&str> {
        rs.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn goal_filter_is_case_insensitive() {
        let filter = RecipeFilter {
            fitness_goal: Some("Weight Loss".into()),
            ..Default::default()
        };
        assert_eq!(titles(&filter.apply(sample())), vec!["Oat bowl", "Egg wrap"]);
    }

    #[test]
    fn allergy_filter_excludes_substring_matches() {
        let filter = RecipeFilter {
            allergy: Some("peanut".into()),
            ..Default::default()
        };
        let out = filter.apply(sample());
        assert_eq!(titles(&out), vec!["Oat bowl", "Egg wrap", "Plain rice"]);
        assert!(out.iter().all(|r| !r.ingredients.to_lowercase().contains("peanut")));
    }

    #[test]
    fn ingredient_filter_and_combination() {
        let filter = RecipeFilter {
            fitness_goal: Some("weight loss".into()),
            allergy: Some("milk".into()),
            ingredient: Some("egg".into()),
        };
        assert_eq!(titles(&filter.apply(sample())), vec!["Egg wrap"]);
    }

    #[test]
    fn blank_filters_keep_everything() {
        let filter = RecipeFilter {
            fitness_goal: Some("".into()),
            allergy: Some("  ".into()),
            ingredient: None,
        };
        assert_eq!(filter.apply(sample()).len(), 4);
    }

    #[test]
    fn parses_ingredient_csv() {
        assert_eq!(
            parse_ingredients(" oats,milk , ,banana,"),
            vec!["oats", "milk", "banana"]
        );
        assert!(parse_ingredients(" , ").is_empty());
    }

    #[test]
    fn fitness_goal_parsing() {
        assert_eq!("weight loss".parse::<FitnessGoal>().unwrap(), FitnessGoal::WeightLoss);
        assert_eq!("MUSCLE_GAIN".parse::<FitnessGoal>().unwrap(), FitnessGoal::MuscleGain);
        assert_eq!(
            "Improved Stamina".parse::<FitnessGoal>().unwrap(),
            FitnessGoal::ImproveStamina
        );
        assert!("bulking".parse::<FitnessGoal>().is_err());
        assert_eq!(
            serde_json::to_string(&FitnessGoal::MuscleGain).unwrap(),
            "\"Muscle Gain\""
        );
        assert_eq!(FitnessGoal::ALL.len(), 3);
    }
}
