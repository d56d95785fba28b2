use std::fmt::Display;
use std::process;

use anyhow::{bail, Context, Result};
use chrono::Local;
use recipe_core::library::planning_window;
use recipe_core::{
    IngredientSet, MealSummary, NutritionFacts, PlanOutcome, Platform, Recipe, RecipeLibrary,
    RecipeSearch, ShareContent,
};
use tracing::warn;

use crate::render;

pub(crate) struct App {
    pub search: RecipeSearch,
    pub library: RecipeLibrary,
}

fn no_results(json: bool) -> ! {
    if json {
        println!("[]");
    } else {
        eprintln!("No recipes found. Try different search terms or filters.");
    }
    process::exit(2);
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn require_recipe(app: &App, id: &str) -> Result<Recipe> {
    app.search
        .lookup(id)
        .await
        .context("Failed to fetch data. Please try again.")?
        .with_context(|| format!("No recipe with id {id}"))
}

pub(crate) async fn cmd_search(app: &App, term: &str, json: bool) -> Result<()> {
    let recipes = app.search.by_name(term).await?;
    if recipes.is_empty() {
        no_results(json);
    }
    if json {
        print_json(&recipes)
    } else {
        render::recipe_list(&recipes, &app.library);
        Ok(())
    }
}

pub(crate) async fn cmd_ingredients(app: &App, ingredients: &[String], json: bool) -> Result<()> {
    let wanted: IngredientSet = ingredients.iter().collect();
    let recipes = app.search.by_ingredients(&wanted).await?;
    if recipes.is_empty() {
        no_results(json);
    }
    if json {
        print_json(&recipes)
    } else {
        render::recipe_list(&recipes, &app.library);
        Ok(())
    }
}

pub(crate) async fn cmd_category(app: &App, category: &str, json: bool) -> Result<()> {
    let meals = app.search.by_category(category).await?;
    print_summaries(app, &meals, json)
}

pub(crate) async fn cmd_area(app: &App, area: &str, json: bool) -> Result<()> {
    let meals = app.search.by_area(area).await?;
    print_summaries(app, &meals, json)
}

fn print_summaries(app: &App, meals: &[MealSummary], json: bool) -> Result<()> {
    if meals.is_empty() {
        no_results(json);
    }
    if json {
        print_json(meals)
    } else {
        render::summary_list(meals, &app.library);
        Ok(())
    }
}

pub(crate) async fn cmd_random(app: &App, json: bool) -> Result<()> {
    let Some(recipe) = app.search.random().await? else {
        no_results(json);
    };
    show_recipe(app, &recipe, json)
}

pub(crate) async fn cmd_show(app: &App, id: &str, json: bool) -> Result<()> {
    let recipe = require_recipe(app, id).await?;
    show_recipe(app, &recipe, json)
}

fn show_recipe(app: &App, recipe: &Recipe, json: bool) -> Result<()> {
    if json {
        print_json(&serde_json::json!({
            "recipe": recipe,
            "nutrition": NutritionFacts::estimate(recipe),
            "favorite": app.library.is_favorite(&recipe.id),
            "rating": app.library.rating(&recipe.id),
        }))
    } else {
        render::recipe_detail(recipe, &app.library);
        Ok(())
    }
}

pub(crate) async fn cmd_categories(app: &App, json: bool) -> Result<()> {
    let categories = app.search.categories().await?;
    if json {
        print_json(&categories)
    } else {
        render::categories(&categories);
        Ok(())
    }
}

pub(crate) async fn cmd_areas(app: &App, json: bool) -> Result<()> {
    let areas = app.search.areas().await?;
    if json {
        print_json(&areas)
    } else {
        render::areas(&areas);
        Ok(())
    }
}

pub(crate) async fn cmd_favorite(app: &mut App, id: &str) -> Result<()> {
    // Removing needs no lookup; the stored entry has everything.
    let meal = match app.library.favorites().find(|f| f.id == id) {
        Some(favorite) => MealSummary {
            id: favorite.id.clone(),
            name: favorite.name.clone(),
            thumbnail: favorite.image.clone(),
        },
        None => require_recipe(app, id).await?.summary(),
    };

    if app.library.toggle_favorite(&meal).await? {
        println!("Added {} to favorites", meal.name);
    } else {
        println!("Removed {} from favorites", meal.name);
    }
    Ok(())
}

pub(crate) fn cmd_favorites(app: &App, json: bool) -> Result<()> {
    if json {
        let favorites: Vec<_> = app.library.favorites().collect();
        print_json(&favorites)
    } else {
        render::favorites(app.library.favorites());
        Ok(())
    }
}

pub(crate) async fn cmd_plan_add(app: &mut App, id: &str, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(date) => date.to_owned(),
        None => Local::now().date_naive().to_string(),
    };
    let meal = require_recipe(app, id).await?.summary();

    match app.library.add_to_meal_plan(&date, &meal).await? {
        PlanOutcome::Added => println!("Added {} to your meal plan for {date}", meal.name),
        PlanOutcome::AlreadyPlanned => {
            println!("{} is already in your meal plan for {date}", meal.name);
        }
    }
    Ok(())
}

pub(crate) async fn cmd_plan_remove(app: &mut App, date: &str, index: usize) -> Result<()> {
    match app.library.remove_from_meal_plan(date, index).await? {
        Some(meal) => println!("Removed {} from your meal plan", meal.name),
        None => bail!("Nothing planned at index {index} on {date}"),
    }
    Ok(())
}

pub(crate) fn cmd_plan_list(app: &App, json: bool) -> Result<()> {
    if json {
        print_json(app.library.meal_plan())
    } else {
        render::meal_plan(app.library.meal_plan());
        Ok(())
    }
}

pub(crate) fn cmd_plan_dates() {
    for date in planning_window(Local::now().date_naive(), 7) {
        println!("{date}  {}", date.format("%a, %b %-d"));
    }
}

pub(crate) async fn cmd_rate(app: &mut App, id: &str, stars: u8) -> Result<()> {
    app.library.rate(id, stars).await?;
    println!("Thanks for rating this recipe! Your rating: {stars}/5");
    Ok(())
}

pub(crate) async fn cmd_share(
    app: &App,
    id: &str,
    platform: Option<Platform>,
    open: bool,
    copy: bool,
) -> Result<()> {
    let recipe = require_recipe(app, id).await?;
    let content = ShareContent::for_recipe(&recipe);

    let Some(platform) = platform else {
        println!("{}", content.url);
        if copy {
            copy_link(&content.url, system_clipboard)?;
        }
        return Ok(());
    };

    let link = content.link(platform);
    println!("{link}");
    if open {
        if let Err(e) = webbrowser::open(&link) {
            warn!(error = %e, %platform, "failed to open share link");
            bail!("Failed to open the {platform} share link");
        }
    }
    if copy {
        copy_link(&link, system_clipboard)?;
    }
    Ok(())
}

fn system_clipboard(text: &str) -> Result<(), arboard::Error> {
    arboard::Clipboard::new()?.set_text(text)
}

fn copy_link<F, E>(link: &str, write: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<(), E>,
    E: Display,
{
    if let Err(e) = write(link) {
        warn!(error = %e, "failed to copy share link");
        bail!("Failed to copy link");
    }
    eprintln!("Link copied to clipboard!");
    Ok(())
}

pub(crate) async fn cmd_theme(app: &mut App) -> Result<()> {
    let dark = app.library.toggle_dark_mode().await?;
    println!("Theme: {}", if dark { "dark" } else { "light" });
    Ok(())
}
