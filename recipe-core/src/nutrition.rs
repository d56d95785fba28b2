//! Rough nutrition estimates derived from a recipe's category and ingredient count.
//!
//! These are display heuristics, not a nutrition computation.

use serde::Serialize;

use crate::recipe::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryProfile {
    Dessert,
    Seafood,
    Vegetarian,
    Meat,
    Other,
}

impl CategoryProfile {
    pub fn from_category(category: Option<&str>) -> Self {
        match category {
            Some("Dessert") => Self::Dessert,
            Some("Seafood") => Self::Seafood,
            Some("Vegetarian") => Self::Vegetarian,
            Some("Chicken" | "Beef" | "Pork") => Self::Meat,
            _ => Self::Other,
        }
    }

    /// `(base calories, protein factor, carbs factor, fat factor)`
    fn factors(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Dessert => (350.0, 0.5, 2.5, 1.5),
            Self::Seafood => (250.0, 2.5, 0.8, 1.0),
            Self::Vegetarian => (200.0, 1.0, 2.0, 0.8),
            Self::Meat => (300.0, 2.0, 1.0, 1.2),
            Self::Other => (275.0, 1.5, 1.5, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NutritionFacts {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl NutritionFacts {
    pub fn estimate(recipe: &Recipe) -> Self {
        Self::for_profile(
            CategoryProfile::from_category(recipe.category.as_deref()),
            recipe.ingredient_count(),
        )
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn for_profile(profile: CategoryProfile, ingredient_count: usize) -> Self {
        let (base, protein, carbs, fat) = profile.factors();
        let round = |value: f64| value.round() as u32;
        Self {
            calories: round(base + 15.0 * ingredient_count as f64),
            protein: round(10.0 * protein),
            carbs: round(30.0 * carbs),
            fat: round(12.0 * fat),
        }
    }
}
