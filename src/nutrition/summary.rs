use serde::{Deserialize, Serialize};

use super::MealMacros;

/// Total protein (grams) that unlocks the protein achievement.
pub const PROTEIN_ACHIEVEMENT_GRAMS: f64 = 100.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
}

impl MacroTotals {
    pub fn from_meals<'a, M: MealMacros + 'a>(meals: impl IntoIterator<Item = &'a M>) -> Self {
        meals.into_iter().fold(Self::default(), |mut acc, m| {
            acc.add(m);
            acc
        })
    }

    fn add<M: MealMacros>(&mut self, meal: &M) {
        self.protein += finite(meal.protein());
        self.carbs += finite(meal.carbs());
        self.fats += finite(meal.fats());
        self.calories += finite(meal.calories());
    }
}

fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    #[default]
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    #[serde(flatten)]
    pub totals: MacroTotals,
}

fn bucket_label<M: MealMacros>(meal: &M, period: SummaryPeriod) -> String {
    let date = meal.date();
    match period {
        SummaryPeriod::Weekly => format!("Week {}", date.day().div_ceil(7)),
        SummaryPeriod::Monthly => date.month().to_string(),
    }
}

/// Groups meals by week-of-month or month name, in order of first appearance.
pub fn summarize<M: MealMacros>(meals: &[M], period: SummaryPeriod) -> Vec<PeriodSummary> {
    let mut out: Vec<PeriodSummary> = Vec::new();
    for meal in meals {
        let label = bucket_label(meal, period);
        match out.iter_mut().find(|s| s.period == label) {
            Some(bucket) => bucket.totals.add(meal),
            None => {
                let mut totals = MacroTotals::default();
                totals.add(meal);
                out.push(PeriodSummary {
                    period: label,
                    totals,
                });
            }
        }
    }
    out
}

pub fn protein_achievement<M: MealMacros>(meals: &[M]) -> bool {
    MacroTotals::from_meals(meals).protein >= PROTEIN_ACHIEVEMENT_GRAMS
}
