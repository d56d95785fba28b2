use std::collections::HashSet;

use crate::recipe::Recipe;

/// User-entered ingredients, normalized to trimmed lowercase.
///
/// Order is kept because the first-added entry is the only one the upstream
/// API can filter on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSet {
    items: Vec<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the input was blank or already present.
    pub fn add(&mut self, raw: &str) -> bool {
        let ingredient = raw.trim().to_lowercase();
        if ingredient.is_empty() || self.contains(&ingredient) {
            return false;
        }
        self.items.push(ingredient);
        true
    }

    pub fn remove(&mut self, raw: &str) -> bool {
        let ingredient = raw.trim().to_lowercase();
        let before = self.items.len();
        self.items.retain(|existing| *existing != ingredient);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.items.iter().any(|existing| existing == ingredient)
    }

    pub fn primary(&self) -> Option<&str> {
        self.items.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IngredientSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.add(item.as_ref());
        }
        set
    }
}

/// True when every wanted ingredient is a substring of some recipe ingredient.
///
/// An empty set matches every recipe.
pub fn matches(recipe: &Recipe, wanted: &IngredientSet) -> bool {
    let available: HashSet<String> = recipe
        .ingredients
        .iter()
        .map(|line| line.ingredient.trim())
        .filter(|ingredient| !ingredient.is_empty())
        .map(str::to_lowercase)
        .collect();

    wanted
        .iter()
        .all(|needle| available.iter().any(|candidate| candidate.contains(needle)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe_with(ingredients: &[&str]) -> Recipe {
        let mut raw = json!({ "idMeal": "1", "strMeal": "Test" });
        for (i, ingredient) in ingredients.iter().enumerate() {
            raw[format!("strIngredient{}", i + 1)] = json!(ingredient);
        }
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let recipe = recipe_with(&["Chicken Breast", "Olive Oil"]);
        let set: IngredientSet = ["chicken"].into_iter().collect();
        assert!(matches(&recipe, &set));
    }

    #[test]
    fn every_ingredient_must_be_present() {
        let recipe = recipe_with(&["Chicken Breast", "Olive Oil"]);
        let set: IngredientSet = ["chicken", "rice"].into_iter().collect();
        assert!(!matches(&recipe, &set));
    }

    #[test]
    fn empty_set_matches_anything() {
        assert!(matches(&recipe_with(&[]), &IngredientSet::new()));
        assert!(matches(&recipe_with(&["Salt"]), &IngredientSet::new()));
    }

    #[test]
    fn recipe_without_ingredients_fails_non_empty_set() {
        let set: IngredientSet = ["salt"].into_iter().collect();
        assert!(!matches(&recipe_with(&[]), &set));
    }

    #[test]
    fn add_normalizes_and_ignores_duplicates() {
        let mut set = IngredientSet::new();
        assert!(set.add("  Garlic "));
        assert!(!set.add("garlic"));
        assert!(!set.add("   "));
        assert_eq!(set.len(), 1);
        assert!(set.contains("garlic"));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut set: IngredientSet = ["egg", "flour"].into_iter().collect();
        let before = set.clone();
        assert!(!set.remove("sugar"));
        assert_eq!(set, before);
        assert!(set.remove("Egg"));
        assert_eq!(set.primary(), Some("flour"));
    }

    #[test]
    fn primary_is_first_added() {
        let mut set = IngredientSet::new();
        set.add("rice");
        set.add("chicken");
        assert_eq!(set.primary(), Some("rice"));
        set.clear();
        assert!(set.primary().is_none());
        assert!(set.is_empty());
    }
}
