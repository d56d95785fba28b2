use std::fmt::Display;
use std::future::Future;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::{FetchError, SearchError};
use crate::gateway::{Endpoint, Gateway};
use crate::ingredients::{matches, IngredientSet};
use crate::recipe::{Area, CategoriesResponse, Category, MealSummary, MealsResponse, Recipe};

/// Runs `task` over `items` with at most `limit` in flight, waits for all of
/// them and keeps the successes in input order. Failures are dropped.
pub async fn settle_bounded<I, F, Fut, T, E>(items: I, limit: usize, task: F) -> Vec<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    stream::iter(items)
        .map(task)
        .buffered(limit.max(1))
        .filter_map(|outcome| async move {
            match outcome {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(error = %err, "dropping failed task");
                    None
                }
            }
        })
        .collect::<Vec<T>>()
        .await
}

#[derive(Debug, Clone)]
pub struct RecipeSearch {
    gateway: Gateway,
    config: SearchConfig,
}

impl RecipeSearch {
    pub fn new(gateway: Gateway, config: SearchConfig) -> Self {
        Self { gateway, config }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub async fn by_name(&self, term: &str) -> Result<Vec<Recipe>, SearchError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let resp: MealsResponse = self
            .gateway
            .fetch_as(&Endpoint::SearchByName(term))
            .await?;
        Ok(resp.records())
    }

    /// Recipes containing every ingredient in `wanted`.
    ///
    /// The API filters on one ingredient only, so the primary ingredient picks
    /// the candidates and the rest are checked against each candidate's detail.
    pub async fn by_ingredients(&self, wanted: &IngredientSet) -> Result<Vec<Recipe>, SearchError> {
        let primary = wanted.primary().ok_or(SearchError::NoIngredients)?;
        let resp: MealsResponse = self
            .gateway
            .fetch_as(&Endpoint::FilterByIngredient(primary))
            .await?;

        let candidates: Vec<MealSummary> = resp
            .records()
            .into_iter()
            .take(self.config.candidate_cap)
            .collect();
        debug!(%primary, candidates = candidates.len(), "fetching candidate details");

        let details = settle_bounded(
            candidates,
            self.config.max_concurrent_lookups,
            |summary| async move { self.lookup(&summary.id).await },
        )
        .await;

        let found: Vec<Recipe> = details
            .into_iter()
            .flatten()
            .filter(|recipe| matches(recipe, wanted))
            .collect();
        info!(%primary, found = found.len(), "ingredient search finished");
        Ok(found)
    }

    pub async fn by_category(&self, category: &str) -> Result<Vec<MealSummary>, SearchError> {
        self.filter(Endpoint::FilterByCategory(category.trim())).await
    }

    pub async fn by_area(&self, area: &str) -> Result<Vec<MealSummary>, SearchError> {
        self.filter(Endpoint::FilterByArea(area.trim())).await
    }

    async fn filter(&self, endpoint: Endpoint<'_>) -> Result<Vec<MealSummary>, SearchError> {
        let blank = match &endpoint {
            Endpoint::FilterByCategory(value) | Endpoint::FilterByArea(value) => value.is_empty(),
            _ => false,
        };
        if blank {
            return Ok(Vec::new());
        }
        let resp: MealsResponse = self.gateway.fetch_as(&endpoint).await?;
        Ok(resp.records())
    }

    pub async fn lookup(&self, id: &str) -> Result<Option<Recipe>, FetchError> {
        let resp: MealsResponse = self.gateway.fetch_as(&Endpoint::Lookup(id)).await?;
        Ok(resp.first())
    }

    pub async fn random(&self) -> Result<Option<Recipe>, FetchError> {
        let resp: MealsResponse = self.gateway.fetch_as(&Endpoint::Random).await?;
        Ok(resp.first())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        let resp: CategoriesResponse = self.gateway.fetch_as(&Endpoint::Categories).await?;
        Ok(resp.records())
    }

    pub async fn areas(&self) -> Result<Vec<Area>, FetchError> {
        let resp: MealsResponse = self.gateway.fetch_as(&Endpoint::ListAreas).await?;
        Ok(resp.records())
    }
}
