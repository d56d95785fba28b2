use recipe_core::library::MealPlan;
use recipe_core::{Area, Category, Favorite, MealSummary, NutritionFacts, Recipe, RecipeLibrary};

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

pub fn recipe_list(recipes: &[Recipe], library: &RecipeLibrary) {
    println!("Found {} Recipe{}", recipes.len(), plural(recipes.len()));
    for recipe in recipes {
        let heart = if library.is_favorite(&recipe.id) { "♥" } else { " " };
        println!(
            "{heart} {:>6}  {}  [{} · {}]",
            recipe.id,
            recipe.name,
            recipe.area.as_deref().unwrap_or("Various"),
            recipe.category.as_deref().unwrap_or("General"),
        );
    }
}

pub fn summary_list(meals: &[MealSummary], library: &RecipeLibrary) {
    println!("Found {} Recipe{}", meals.len(), plural(meals.len()));
    for meal in meals {
        let heart = if library.is_favorite(&meal.id) { "♥" } else { " " };
        println!("{heart} {:>6}  {}", meal.id, meal.name);
    }
}

pub fn recipe_detail(recipe: &Recipe, library: &RecipeLibrary) {
    let saved = if library.is_favorite(&recipe.id) { " (saved)" } else { "" };
    println!("{}{saved}", recipe.name);
    println!("{}", "=".repeat(recipe.name.chars().count() + saved.len()));
    println!("Cuisine:  {}", recipe.area.as_deref().unwrap_or("Various"));
    println!("Category: {}", recipe.category.as_deref().unwrap_or("General"));
    let tags = recipe.tags();
    if !tags.is_empty() {
        println!("Tags:     {}", tags.join(", "));
    }
    if let Some(video) = &recipe.youtube {
        println!("Video:    {video}");
    }
    println!("Image:    {}", recipe.thumbnail);

    println!("\nIngredients");
    for line in &recipe.ingredients {
        if line.measure.is_empty() {
            println!("  - {}", line.ingredient);
        } else {
            println!("  - {} {}", line.measure, line.ingredient);
        }
    }

    let facts = NutritionFacts::estimate(recipe);
    println!("\nEstimated Nutrition Facts");
    println!(
        "  {} kcal · {}g protein · {}g carbs · {}g fat",
        facts.calories, facts.protein, facts.carbs, facts.fat
    );
    println!("  * Nutrition values are estimated and may vary");

    println!("\nInstructions");
    for (i, step) in recipe.instruction_steps().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, step.trim());
    }

    match library.rating(&recipe.id) {
        Some(stars) => println!("\nYour rating: {stars}/5"),
        None => println!("\nRate this recipe with `recipe-finder rate {} <1-5>`", recipe.id),
    }
}

pub fn categories(categories: &[Category]) {
    for category in categories {
        println!("{}", category.name);
        println!("    {}...", category.blurb());
    }
}

pub fn areas(areas: &[Area]) {
    for area in areas {
        match area.flag_url() {
            Some(flag) => println!("{} Cuisine  ({flag})", area.name),
            None => println!("{} Cuisine", area.name),
        }
    }
}

pub fn favorites<'a>(favorites: impl Iterator<Item = &'a Favorite>) {
    let mut any = false;
    for favorite in favorites {
        if !any {
            println!("Your Favorite Recipes");
            any = true;
        }
        println!(
            "  {:>6}  {}  (saved {})",
            favorite.id,
            favorite.name,
            favorite.date_added.format("%Y-%m-%d")
        );
    }
    if !any {
        println!("You haven't saved any favorites yet.");
    }
}

pub fn meal_plan(plan: &MealPlan) {
    if plan.is_empty() {
        println!("You haven't planned any meals yet.");
        return;
    }
    println!("Your Meal Plan");
    for (date, meals) in plan {
        let heading = recipe_core::library::parse_plan_date(date)
            .map(|d| d.format("%A, %B %-d").to_string())
            .unwrap_or_else(|_| date.clone());
        println!("\n{heading} ({date})");
        for (index, meal) in meals.iter().enumerate() {
            println!("  [{index}] {:>6}  {}", meal.id, meal.name);
        }
    }
}
