use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// TheMealDB exposes ingredients as numbered fields `strIngredient1..=20`.
pub const INGREDIENT_SLOTS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientLine {
    /// 1-based slot number in the upstream record.
    pub slot: usize,
    pub ingredient: String,
    pub measure: String,
}

/// A full recipe as returned by `lookup.php`, `search.php` or `random.php`.
///
/// Serializes in its own field names and reads back from either those or the
/// upstream `idMeal`/`strMeal`/`strIngredientN` record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    pub area: Option<String>,
    pub category: Option<String>,
    /// Non-blank ingredient slots in slot order.
    pub ingredients: Vec<IngredientLine>,
    pub instructions: String,
    pub tags: Option<String>,
    pub youtube: Option<String>,
}

fn string_field(raw: &Map<String, Value>, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(ToOwned::to_owned)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The shape `Recipe` serializes to.
#[derive(Deserialize)]
struct SavedRecipe {
    id: String,
    name: String,
    #[serde(default)]
    thumbnail: String,
    area: Option<String>,
    category: Option<String>,
    #[serde(default)]
    ingredients: Vec<IngredientLine>,
    #[serde(default)]
    instructions: String,
    tags: Option<String>,
    youtube: Option<String>,
}

impl From<SavedRecipe> for Recipe {
    fn from(saved: SavedRecipe) -> Self {
        Self {
            id: saved.id,
            name: saved.name,
            thumbnail: saved.thumbnail,
            area: saved.area,
            category: saved.category,
            ingredients: saved.ingredients,
            instructions: saved.instructions,
            tags: saved.tags,
            youtube: saved.youtube,
        }
    }
}

impl TryFrom<Map<String, Value>> for Recipe {
    type Error = String;

    fn try_from(raw: Map<String, Value>) -> Result<Self, Self::Error> {
        if !raw.contains_key("idMeal") && raw.contains_key("id") {
            return serde_json::from_value::<SavedRecipe>(Value::Object(raw))
                .map(Recipe::from)
                .map_err(|e| e.to_string());
        }

        let id = string_field(&raw, "idMeal").ok_or("missing idMeal")?;
        let name = string_field(&raw, "strMeal").ok_or("missing strMeal")?;

        let ingredients = (1..=INGREDIENT_SLOTS)
            .filter_map(|slot| {
                let ingredient = non_blank(string_field(&raw, &format!("strIngredient{slot}")))?;
                let measure = string_field(&raw, &format!("strMeasure{slot}")).unwrap_or_default();
                Some(IngredientLine {
                    slot,
                    ingredient,
                    measure: measure.trim().to_owned(),
                })
            })
            .collect();

        Ok(Self {
            id,
            name,
            thumbnail: string_field(&raw, "strMealThumb").unwrap_or_default(),
            area: non_blank(string_field(&raw, "strArea")),
            category: non_blank(string_field(&raw, "strCategory")),
            ingredients,
            instructions: string_field(&raw, "strInstructions").unwrap_or_default(),
            tags: non_blank(string_field(&raw, "strTags")),
            youtube: non_blank(string_field(&raw, "strYoutube")),
        })
    }
}

impl Recipe {
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Instructions split on any line break, blank lines dropped.
    pub fn instruction_steps(&self) -> Vec<&str> {
        self.instructions
            .split(['\r', '\n'])
            .filter(|step| !step.trim().is_empty())
            .collect()
    }

    pub fn summary(&self) -> MealSummary {
        MealSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            thumbnail: self.thumbnail.clone(),
        }
    }
}

/// Short form returned by the `filter.php` endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealSummary {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    #[serde(rename = "idCategory")]
    pub id: String,
    #[serde(rename = "strCategory")]
    pub name: String,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: String,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: String,
}

impl Category {
    /// First 100 characters of the description, as shown on category cards.
    pub fn blurb(&self) -> String {
        self.description.chars().take(100).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Area {
    #[serde(rename = "strArea")]
    pub name: String,
}

impl Area {
    pub fn country_code(&self) -> Option<&'static str> {
        let code = match self.name.as_str() {
            "American" => "us",
            "British" => "gb",
            "Canadian" => "ca",
            "Chinese" => "cn",
            "Dutch" => "nl",
            "Egyptian" => "eg",
            "French" => "fr",
            "Greek" => "gr",
            "Indian" => "in",
            "Irish" => "ie",
            "Italian" => "it",
            "Jamaican" => "jm",
            "Japanese" => "jp",
            "Kenyan" => "ke",
            "Malaysian" => "my",
            "Mexican" => "mx",
            "Moroccan" => "ma",
            "Polish" => "pl",
            "Portuguese" => "pt",
            "Russian" => "ru",
            "Spanish" => "es",
            "Thai" => "th",
            "Tunisian" => "tn",
            "Turkish" => "tr",
            "Vietnamese" => "vn",
            _ => return None,
        };
        Some(code)
    }

    pub fn flag_url(&self) -> Option<String> {
        self.country_code()
            .map(|code| format!("https://flagcdn.com/48x36/{code}.png"))
    }
}

/// Decodes each record on its own; malformed ones are logged and skipped.
fn decode_records<T: DeserializeOwned>(records: Option<Vec<Value>>) -> Vec<T> {
    records
        .unwrap_or_default()
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<T>(record) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!(error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// Envelope for every endpoint that answers with `{"meals": [...] | null}`.
#[derive(Debug, Deserialize)]
pub struct MealsResponse {
    pub meals: Option<Vec<Value>>,
}

impl MealsResponse {
    pub fn records<T: DeserializeOwned>(self) -> Vec<T> {
        decode_records(self.meals)
    }

    pub fn first<T: DeserializeOwned>(self) -> Option<T> {
        self.records().into_iter().next()
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Option<Vec<Value>>,
}

impl CategoriesResponse {
    pub fn records(self) -> Vec<Category> {
        decode_records(self.categories)
    }
}
