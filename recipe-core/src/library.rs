use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::LibraryError;
use crate::recipe::MealSummary;
use crate::storage::JsonStore;

pub const FAVORITES_KEY: &str = "favorites";
pub const MEAL_PLAN_KEY: &str = "mealPlan";
pub const RATINGS_KEY: &str = "ratings";
pub const DARK_MODE_KEY: &str = "darkMode";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorite {
    pub id: String,
    pub name: String,
    pub image: String,
    #[serde(rename = "dateAdded")]
    pub date_added: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedMeal {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl From<&MealSummary> for PlannedMeal {
    fn from(meal: &MealSummary) -> Self {
        Self {
            id: meal.id.clone(),
            name: meal.name.clone(),
            image: meal.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutcome {
    Added,
    AlreadyPlanned,
}

pub type MealPlan = BTreeMap<String, Vec<PlannedMeal>>;

/// The user's favorites, meal plan, ratings and theme preference.
///
/// Each mutation saves an updated copy of its document and only replaces the
/// in-memory state once the save succeeds.
#[derive(Debug, Clone)]
pub struct RecipeLibrary {
    store: JsonStore,
    favorites: BTreeMap<String, Favorite>,
    meal_plan: MealPlan,
    ratings: BTreeMap<String, u8>,
    dark_mode: bool,
}

impl RecipeLibrary {
    pub async fn load(store: JsonStore) -> Self {
        let favorites = store.load(FAVORITES_KEY, BTreeMap::new()).await;

        let mut meal_plan: MealPlan = store.load(MEAL_PLAN_KEY, BTreeMap::new()).await;
        meal_plan.retain(|_, meals| !meals.is_empty());

        let stored: BTreeMap<String, Value> = store.load(RATINGS_KEY, BTreeMap::new()).await;
        let ratings = stored
            .into_iter()
            .filter_map(|(id, value)| {
                let rating = value
                    .as_u64()
                    .and_then(|v| u8::try_from(v).ok())
                    .filter(|v| (MIN_RATING..=MAX_RATING).contains(v));
                if rating.is_none() {
                    debug!(%id, %value, "ignoring stored rating");
                }
                Some((id, rating?))
            })
            .collect();

        let dark_mode = store.load(DARK_MODE_KEY, false).await;

        Self {
            store,
            favorites,
            meal_plan,
            ratings,
            dark_mode,
        }
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains_key(id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Favorite> {
        self.favorites.values()
    }

    /// Adds the meal to favorites, or removes it when already there.
    /// Returns whether it is a favorite afterwards.
    pub async fn toggle_favorite(&mut self, meal: &MealSummary) -> Result<bool, LibraryError> {
        let mut favorites = self.favorites.clone();
        let now_favorite = if favorites.remove(&meal.id).is_some() {
            false
        } else {
            favorites.insert(
                meal.id.clone(),
                Favorite {
                    id: meal.id.clone(),
                    name: meal.name.clone(),
                    image: meal.thumbnail.clone(),
                    date_added: Utc::now(),
                },
            );
            true
        };
        self.store.save(FAVORITES_KEY, &favorites).await?;
        self.favorites = favorites;
        info!(id = %meal.id, favorite = now_favorite, "toggled favorite");
        Ok(now_favorite)
    }

    pub fn meal_plan(&self) -> &MealPlan {
        &self.meal_plan
    }

    /// Plans `meal` on `date` (`YYYY-MM-DD`). A meal already planned that day
    /// is left alone and nothing is written.
    pub async fn add_to_meal_plan(
        &mut self,
        date: &str,
        meal: &MealSummary,
    ) -> Result<PlanOutcome, LibraryError> {
        let key = parse_plan_date(date)?.to_string();

        if self
            .meal_plan
            .get(&key)
            .is_some_and(|meals| meals.iter().any(|m| m.id == meal.id))
        {
            debug!(id = %meal.id, date = %key, "meal already planned");
            return Ok(PlanOutcome::AlreadyPlanned);
        }

        let mut meal_plan = self.meal_plan.clone();
        meal_plan
            .entry(key.clone())
            .or_default()
            .push(PlannedMeal::from(meal));
        self.store.save(MEAL_PLAN_KEY, &meal_plan).await?;
        self.meal_plan = meal_plan;
        info!(id = %meal.id, date = %key, "planned meal");
        Ok(PlanOutcome::Added)
    }

    /// Removes the `index`-th meal planned on `date`, dropping the date once
    /// it has no meals left. Unknown dates and indexes change nothing.
    pub async fn remove_from_meal_plan(
        &mut self,
        date: &str,
        index: usize,
    ) -> Result<Option<PlannedMeal>, LibraryError> {
        let key = parse_plan_date(date)?.to_string();
        if self.meal_plan.get(&key).map_or(true, |meals| index >= meals.len()) {
            return Ok(None);
        }

        let mut meal_plan = self.meal_plan.clone();
        let Some(meals) = meal_plan.get_mut(&key) else {
            return Ok(None);
        };
        let removed = meals.remove(index);
        if meals.is_empty() {
            meal_plan.remove(&key);
        }
        self.store.save(MEAL_PLAN_KEY, &meal_plan).await?;
        self.meal_plan = meal_plan;
        info!(id = %removed.id, date = %key, "unplanned meal");
        Ok(Some(removed))
    }

    pub fn rating(&self, id: &str) -> Option<u8> {
        self.ratings.get(id).copied()
    }

    pub async fn rate(&mut self, id: &str, value: u8) -> Result<(), LibraryError> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(LibraryError::InvalidRating(value));
        }
        let mut ratings = self.ratings.clone();
        ratings.insert(id.to_owned(), value);
        self.store.save(RATINGS_KEY, &ratings).await?;
        self.ratings = ratings;
        info!(%id, value, "rated recipe");
        Ok(())
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub async fn toggle_dark_mode(&mut self) -> Result<bool, LibraryError> {
        let dark_mode = !self.dark_mode;
        self.store.save(DARK_MODE_KEY, &dark_mode).await?;
        self.dark_mode = dark_mode;
        Ok(dark_mode)
    }
}

pub fn parse_plan_date(date: &str) -> Result<NaiveDate, LibraryError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| LibraryError::InvalidDate(date.to_owned()))
}

/// `days` consecutive dates starting at `start`, the choices offered when planning.
pub fn planning_window(start: NaiveDate, days: u64) -> Vec<NaiveDate> {
    (0..days)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(id: &str) -> MealSummary {
        MealSummary {
            id: id.into(),
            name: format!("Meal {id}"),
            thumbnail: format!("https://img/{id}.jpg"),
        }
    }

    #[tokio::test]
    async fn rejects_out_of_range_ratings() {
        let mut library = RecipeLibrary::load(JsonStore::in_memory()).await;
        assert!(matches!(
            library.rate("1", 0).await,
            Err(LibraryError::InvalidRating(0))
        ));
        assert!(matches!(
            library.rate("1", 6).await,
            Err(LibraryError::InvalidRating(6))
        ));
        library.rate("1", 5).await.unwrap();
        library.rate("1", 2).await.unwrap();
        assert_eq!(library.rating("1"), Some(2));
    }

    #[tokio::test]
    async fn meal_plan_requires_iso_dates() {
        let mut library = RecipeLibrary::load(JsonStore::in_memory()).await;
        let err = library.add_to_meal_plan("14/10/2026", &meal("1")).await;
        assert!(matches!(err, Err(LibraryError::InvalidDate(_))));
        assert!(library.meal_plan().is_empty());
    }

    #[tokio::test]
    async fn same_meal_can_be_planned_on_different_days() {
        let mut library = RecipeLibrary::load(JsonStore::in_memory()).await;
        let m = meal("52772");
        assert_eq!(library.add_to_meal_plan("2026-10-14", &m).await.unwrap(), PlanOutcome::Added);
        assert_eq!(library.add_to_meal_plan("2026-10-15", &m).await.unwrap(), PlanOutcome::Added);
        assert_eq!(
            library.add_to_meal_plan("2026-10-14", &m).await.unwrap(),
            PlanOutcome::AlreadyPlanned
        );
        assert_eq!(library.meal_plan().len(), 2);
    }

    #[tokio::test]
    async fn out_of_range_removal_is_noop() {
        let mut library = RecipeLibrary::load(JsonStore::in_memory()).await;
        library.add_to_meal_plan("2026-10-14", &meal("1")).await.unwrap();
        assert!(library.remove_from_meal_plan("2026-10-14", 3).await.unwrap().is_none());
        assert!(library.remove_from_meal_plan("2026-10-20", 0).await.unwrap().is_none());
        assert_eq!(library.meal_plan()["2026-10-14"].len(), 1);
    }

    #[tokio::test]
    async fn dark_mode_toggles() {
        let mut library = RecipeLibrary::load(JsonStore::in_memory()).await;
        assert!(!library.dark_mode());
        assert!(library.toggle_dark_mode().await.unwrap());
        let reloaded = RecipeLibrary::load(library.store().clone()).await;
        assert!(reloaded.dark_mode());
    }

    #[test]
    fn planning_window_covers_a_week() {
        let start = NaiveDate::from_ymd_opt(2026, 12, 29).unwrap();
        let window = planning_window(start, 7);
        assert_eq!(window.len(), 7);
        assert_eq!(window[6].to_string(), "2027-01-04");
    }
}
