use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ApiError;
use crate::lenient;
use crate::nutrition::{self, MacroInput, MacroTotals, MealWarning, PeriodSummary, SummaryPeriod};

use super::repo_types::{Meal, NewMeal};

/// Body of `POST /api/meals` and `PUT /api/meals/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct MealRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fats: Option<f64>,
    pub date: Option<Date>,
}

impl MealRequest {
    /// Checks required fields; calories are derived from the macros when absent.
    pub fn validate(self) -> Result<NewMeal, ApiError> {
        let missing = || ApiError::bad_request("All fields are required.");
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(missing)?;
        let protein = self.protein.ok_or_else(missing)?;
        let carbs = self.carbs.ok_or_else(missing)?;
        let fats = self.fats.ok_or_else(missing)?;
        let date = self.date.ok_or_else(missing)?;
        if [protein, carbs, fats].iter().any(|g| *g < 0.0) {
            return Err(ApiError::bad_request("Macros cannot be negative."));
        }
        let calories = match self.calories {
            Some(kcal) if kcal.is_finite() => kcal.round() as i32,
            _ => nutrition::calories(protein, carbs, fats),
        };
        Ok(NewMeal {
            name,
            calories,
            protein,
            carbs,
            fats,
            date,
        })
    }
}

impl NewMeal {
    pub fn macros(&self) -> MacroInput {
        MacroInput {
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            calories: f64::from(self.calories),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    #[serde(flatten)]
    pub meal: Meal,
    pub warning: Option<String>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        let warning = nutrition::classify_meal(&NewMeal::from(&meal).macros())
            .map(|w| w.message().to_string());
        Self { meal, warning }
    }
}

/// Body of `POST /api/meals/assess`.
#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fats: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub calories: Option<f64>,
}

/// Same `warning` shape as [`MealResponse`].
#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub calories: i32,
    pub warning: Option<String>,
}

impl AssessResponse {
    pub fn new(calories: i32, warning: Option<MealWarning>) -> Self {
        Self {
            calories,
            warning: warning.map(|w| w.message().to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub period: SummaryPeriod,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub period: SummaryPeriod,
    pub totals: MacroTotals,
    pub buckets: Vec<PeriodSummary>,
    pub protein_achievement: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn request(json: &str) -> MealRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn derives_calories_when_absent() {
        let meal = request(
            r#"{"name":"Chicken bowl","protein":"30","carbs":"10","fats":"5","date":"2025-03-01"}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(meal.calories, 205);
        assert_eq!(meal.date, date!(2025 - 03 - 01));
    }

    #[test]
    fn keeps_user_entered_calories() {
        let meal = request(
            r#"{"name":"Pasta","calories":512.4,"protein":20,"carbs":15,"fats":10,"date":"2025-03-01"}"#,
        )
        .validate()
        .unwrap();
        assert_eq!(meal.calories, 512);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = request(r#"{"name":"  ","protein":1,"carbs":1,"fats":1,"date":"2025-03-01"}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "All fields are required.");

        let err = request(r#"{"name":"Toast","protein":1,"carbs":1,"date":"2025-03-01"}"#)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn negative_and_non_finite_macros_are_rejected() {
        let err = request(r#"{"name":"Toast","protein":-5,"carbs":1,"fats":1,"date":"2025-03-01"}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Macros cannot be negative.");

        assert!(serde_json::from_str::<MealRequest>(
            r#"{"name":"Toast","protein":"NaN","carbs":1,"fats":1,"date":"2025-03-01"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<MealRequest>(
            r#"{"name":"Toast","protein":1,"carbs":"inf","fats":1,"date":"2025-03-01"}"#
        )
        .is_err());
    }

    #[test]
    fn assess_and_meal_warnings_share_a_shape() {
        let assess = serde_json::to_value(AssessResponse::new(
            413,
            Some(MealWarning::UnbalancedMacros),
        ))
        .unwrap();
        let meal = serde_json::to_value(MealResponse::from(Meal {
            id: uuid::Uuid::new_v4(),
            name: "Candy".into(),
            calories: 413,
            protein: 1.0,
            carbs: 100.0,
            fats: 1.0,
            date: date!(2025 - 03 - 01),
            created_at: time::OffsetDateTime::now_utc(),
        }))
        .unwrap();
        assert_eq!(assess["warning"], meal["warning"]);
        assert!(assess.get("message").is_none());

        let calm = serde_json::to_value(AssessResponse::new(205, None)).unwrap();
        assert!(calm["warning"].is_null());
    }

    #[test]
    fn response_carries_warning() {
        let meal = request(r#"{"name":"Candy","protein":1,"carbs":100,"fats":1,"date":"2025-03-01"}"#)
            .validate()
            .unwrap();
        let row = Meal {
            id: uuid::Uuid::new_v4(),
            name: meal.name.clone(),
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fats: meal.fats,
            date: meal.date,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(MealResponse::from(row)).unwrap();
        assert_eq!(json["name"], "Candy");
        assert_eq!(json["calories"], 413);
        assert_eq!(json["date"], "2025-03-01");
        assert!(json["warning"].as_str().unwrap().contains("unbalanced"));
    }
}
