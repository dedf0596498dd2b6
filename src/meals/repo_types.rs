use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::MealMacros;

/// Logged meal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub calories: i32,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fats: f64,    // grams
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated meal fields ready to be written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeal {
    pub name: String,
    pub calories: i32,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub date: Date,
}

impl From<&Meal> for NewMeal {
    fn from(m: &Meal) -> Self {
        Self {
            name: m.name.clone(),
            calories: m.calories,
            protein: m.protein,
            carbs: m.carbs,
            fats: m.fats,
            date: m.date,
        }
    }
}

impl MealMacros for Meal {
    fn protein(&self) -> f64 {
        self.protein
    }
    fn carbs(&self) -> f64 {
        self.carbs
    }
    fn fats(&self) -> f64 {
        self.fats
    }
    fn calories(&self) -> f64 {
        f64::from(self.calories)
    }
    fn date(&self) -> Date {
        self.date
    }
}
