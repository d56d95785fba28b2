pub mod config;
pub mod error;
pub mod gateway;
pub mod ingredients;
pub mod library;
pub mod nutrition;
pub mod recipe;
pub mod search;
pub mod share;
pub mod storage;

pub use config::{ApiConfig, AppConfig, SearchConfig};
pub use error::{FetchError, LibraryError, SearchError, StoreError};
pub use gateway::{encode_component, Endpoint, Gateway, LoadingGuard, LoadingIndicator};
pub use ingredients::{matches, IngredientSet};
pub use library::{Favorite, MealPlan, PlanOutcome, PlannedMeal, RecipeLibrary};
pub use nutrition::{CategoryProfile, NutritionFacts};
pub use recipe::{Area, Category, IngredientLine, MealSummary, Recipe};
pub use search::{settle_bounded, RecipeSearch};
pub use share::{Platform, ShareContent};
pub use storage::JsonStore;
