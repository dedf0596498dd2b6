//! Derived meal metrics: calories from macros and the unhealthy-meal heuristic.

mod summary;

pub use summary::{protein_achievement, summarize, MacroTotals, PeriodSummary, SummaryPeriod};

use serde::{Deserialize, Serialize};
use time::Date;

pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Calories above which a meal is always flagged.
pub const HIGH_CALORIE_THRESHOLD: f64 = 800.0;
pub const MAX_CARB_RATIO: f64 = 4.0;
pub const MAX_FAT_RATIO: f64 = 1.5;

/// Anything exposing the macro fields of a logged meal.
pub trait MealMacros {
    fn protein(&self) -> f64;
    fn carbs(&self) -> f64;
    fn fats(&self) -> f64;
    fn calories(&self) -> f64;
    fn date(&self) -> Date;
}

/// Parses user-entered grams; non-numeric text counts as zero.
pub fn parse_grams(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize).unwrap_or(0.0)
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// `round(protein*4 + carbs*4 + fats*9)` with negative or NaN inputs coerced to 0.
pub fn calories(protein: f64, carbs: f64, fats: f64) -> i32 {
    let kcal = sanitize(protein) * KCAL_PER_GRAM_PROTEIN
        + sanitize(carbs) * KCAL_PER_GRAM_CARBS
        + sanitize(fats) * KCAL_PER_GRAM_FAT;
    kcal.round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealWarning {
    HighCalories,
    UnbalancedMacros,
}

impl MealWarning {
    pub fn message(&self) -> &'static str {
        match self {
            MealWarning::HighCalories => {
                "This meal is high in calories. Consider a lighter option."
            }
            MealWarning::UnbalancedMacros => {
                "The macronutrient ratio seems unbalanced. Try a better mix of protein, carbs, and fats."
            }
        }
    }
}

impl std::fmt::Display for MealWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Macro values as judged by [`classify_meal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroInput {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
}

impl MacroInput {
    /// Builds the input with calories derived from the macros.
    pub fn from_macros(protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            protein,
            carbs,
            fats,
            calories: f64::from(calories(protein, carbs, fats)),
        }
    }
}

/// Ratio where a positive amount over nothing is unbounded and 0/0 is 0.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

/// Flags a meal as unhealthy; the calorie check wins over the ratio check.
pub fn classify_meal(meal: &MacroInput) -> Option<MealWarning> {
    let protein = sanitize(meal.protein);
    let carbs = sanitize(meal.carbs);
    let fats = sanitize(meal.fats);

    if sanitize(meal.calories) > HIGH_CALORIE_THRESHOLD {
        return Some(MealWarning::HighCalories);
    }
    if ratio(carbs, protein + fats) > MAX_CARB_RATIO || ratio(fats, protein + carbs) > MAX_FAT_RATIO
    {
        return Some(MealWarning::UnbalancedMacros);
    }
    None
}
