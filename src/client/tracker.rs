use std::time::{Duration, Instant};

use time::Date;
use tracing::{debug, info};
use uuid::Uuid;

use crate::meals::{Meal, NewMeal};
use crate::nutrition::{
    self, parse_grams, MacroInput, MacroTotals, MealWarning, PeriodSummary, SummaryPeriod,
};

use super::api::{ClientError, MealsApi};

/// How long a deleted meal can be restored.
pub const UNDO_WINDOW: Duration = Duration::from_secs(5);

/// Meal form contents as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealDraft {
    pub name: String,
    pub protein: String,
    pub carbs: String,
    pub fats: String,
    pub date: Option<Date>,
}

impl MealDraft {
    /// Calories shown next to the form while typing.
    pub fn calories(&self) -> i32 {
        nutrition::calories(
            parse_grams(&self.protein),
            parse_grams(&self.carbs),
            parse_grams(&self.fats),
        )
    }

    pub fn macros(&self) -> MacroInput {
        MacroInput::from_macros(
            parse_grams(&self.protein),
            parse_grams(&self.carbs),
            parse_grams(&self.fats),
        )
    }

    pub fn warning(&self) -> Option<MealWarning> {
        nutrition::classify_meal(&self.macros())
    }

    fn to_new_meal(&self) -> Result<NewMeal, ClientError> {
        let blank = |s: &str| s.trim().is_empty();
        let date = match self.date {
            Some(d) if !blank(&self.name) && !blank(&self.protein) && !blank(&self.carbs) && !blank(&self.fats) => d,
            _ => return Err(ClientError::Validation("All fields are required.".into())),
        };
        let macros = self.macros();
        Ok(NewMeal {
            name: self.name.trim().to_string(),
            calories: self.calories(),
            protein: macros.protein,
            carbs: macros.carbs,
            fats: macros.fats,
            date,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Meal),
    /// Nothing was sent; resubmit with `confirmed = true` to save anyway.
    NeedsConfirmation(MealWarning),
}

#[derive(Debug, Clone)]
struct PendingUndo {
    meal: Meal,
    deleted_at: Instant,
}

/// Meal log state: the server's list plus undo and achievement bookkeeping.
pub struct DietTracker<A> {
    api: A,
    meals: Vec<Meal>,
    pending_undo: Option<PendingUndo>,
    achievement_shown: bool,
}

impl<A: MealsApi> DietTracker<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            meals: Vec::new(),
            pending_undo: None,
            achievement_shown: false,
        }
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.meals = self.api.list_meals().await?;
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.meals.sort_by(|a, b| b.date.cmp(&a.date));
    }

    pub async fn submit(&mut self, draft: &MealDraft, confirmed: bool) -> Result<SubmitOutcome, ClientError> {
        let new_meal = draft.to_new_meal()?;
        if let Some(warning) = draft.warning().filter(|_| !confirmed) {
            return Ok(SubmitOutcome::NeedsConfirmation(warning));
        }
        let meal = self.api.create_meal(&new_meal).await?;
        info!(meal_id = %meal.id, "meal saved");
        self.meals.push(meal.clone());
        self.sort();
        Ok(SubmitOutcome::Saved(meal))
    }

    pub async fn update(
        &mut self,
        id: Uuid,
        draft: &MealDraft,
        confirmed: bool,
    ) -> Result<SubmitOutcome, ClientError> {
        if !self.meals.iter().any(|m| m.id == id) {
            return Err(ClientError::UnknownItem(id));
        }
        let new_meal = draft.to_new_meal()?;
        if let Some(warning) = draft.warning().filter(|_| !confirmed) {
            return Ok(SubmitOutcome::NeedsConfirmation(warning));
        }
        let meal = self.api.update_meal(id, &new_meal).await?;
        if let Some(slot) = self.meals.iter_mut().find(|m| m.id == id) {
            *slot = meal.clone();
        }
        self.sort();
        Ok(SubmitOutcome::Saved(meal))
    }

    /// Deletes on the server, then keeps the meal around for [`UNDO_WINDOW`].
    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let idx = self
            .meals
            .iter()
            .position(|m| m.id == id)
            .ok_or(ClientError::UnknownItem(id))?;
        self.api.delete_meal(id).await?;
        let meal = self.meals.remove(idx);
        self.pending_undo = Some(PendingUndo {
            meal,
            deleted_at: Instant::now(),
        });
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo_available_at(Instant::now())
    }

    fn undo_available_at(&self, now: Instant) -> bool {
        self.pending_undo
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.deleted_at) < UNDO_WINDOW)
    }

    /// Re-creates the last deleted meal with the same fields; the id is new.
    pub async fn undo_delete(&mut self) -> Result<Option<Meal>, ClientError> {
        self.undo_delete_at(Instant::now()).await
    }

    async fn undo_delete_at(&mut self, now: Instant) -> Result<Option<Meal>, ClientError> {
        if !self.undo_available_at(now) {
            debug!("undo window closed");
            self.pending_undo = None;
            return Ok(None);
        }
        let Some(pending) = self.pending_undo.take() else {
            return Ok(None);
        };
        let restored = self.api.create_meal(&NewMeal::from(&pending.meal)).await?;
        self.meals.push(restored.clone());
        self.sort();
        Ok(Some(restored))
    }

    pub fn totals(&self) -> MacroTotals {
        MacroTotals::from_meals(&self.meals)
    }

    pub fn summary(&self, period: SummaryPeriod) -> Vec<PeriodSummary> {
        nutrition::summarize(&self.meals, period)
    }

    /// True exactly once, the first time the protein goal is reached.
    pub fn take_protein_achievement(&mut self) -> bool {
        if self.achievement_shown || !nutrition::protein_achievement(&self.meals) {
            return false;
        }
        self.achievement_shown = true;
        true
    }
}
