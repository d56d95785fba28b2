mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use recipe_core::{AppConfig, Gateway, JsonStore, LoadingIndicator, Platform, RecipeLibrary, RecipeSearch};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::App;

#[derive(Parser)]
#[command(name = "recipe-finder", version, about = "Find recipes by name, ingredients, category or cuisine")]
struct Cli {
    /// Directory holding favorites, meal plan, ratings and theme documents
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Path to config.json (default: the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search recipes by name
    Search {
        term: String,
        #[arg(long)]
        json: bool,
    },
    /// Find recipes containing every listed ingredient (the first one drives the lookup)
    Ingredients {
        #[arg(required = true, num_args = 1..)]
        ingredients: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// List recipes in a category
    Category {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// List recipes from a cuisine
    Area {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Show a random recipe
    Random {
        #[arg(long)]
        json: bool,
    },
    /// Show a recipe with estimated nutrition facts
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// List recipe categories
    Categories {
        #[arg(long)]
        json: bool,
    },
    /// List cuisines
    Areas {
        #[arg(long)]
        json: bool,
    },
    /// Add a recipe to favorites, or remove it if already saved
    Favorite { id: String },
    /// List saved favorites
    Favorites {
        #[arg(long)]
        json: bool,
    },
    /// Manage the meal plan
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },
    /// Rate a recipe from 1 to 5
    Rate { id: String, stars: u8 },
    /// Print, open or copy a share link for a recipe
    Share {
        id: String,
        /// facebook, twitter, pinterest or email; omit to print the recipe link
        platform: Option<Platform>,
        /// Open the link in the default browser
        #[arg(long)]
        open: bool,
        /// Copy the link to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Toggle dark mode
    Theme,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Plan a recipe for a date (YYYY-MM-DD, default: today)
    Add { id: String, date: Option<String> },
    /// Remove the meal at INDEX on DATE
    Remove { date: String, index: usize },
    /// Show the meal plan
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the next seven dates available for planning
    Dates,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> AppConfig {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    config
}

fn spawn_loading_notice(loading: &LoadingIndicator) {
    if !std::io::stderr().is_terminal() {
        return;
    }
    let mut rx = loading.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            if *rx.borrow_and_update() > 0 {
                eprint!("\rLoading...");
            } else {
                eprint!("\r          \r");
            }
        }
    });
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli);
    let data_dir = config.resolved_data_dir();
    debug!(data_dir = %data_dir.display(), base_url = %config.api.base_url, "starting");

    let gateway = Gateway::new(&config.api)?;
    spawn_loading_notice(gateway.loading());
    let library = RecipeLibrary::load(JsonStore::in_dir(&data_dir)).await;
    let mut app = App {
        search: RecipeSearch::new(gateway, config.search),
        library,
    };

    match cli.command {
        Commands::Search { term, json } => commands::cmd_search(&app, &term, json).await,
        Commands::Ingredients { ingredients, json } => {
            commands::cmd_ingredients(&app, &ingredients, json).await
        }
        Commands::Category { name, json } => commands::cmd_category(&app, &name, json).await,
        Commands::Area { name, json } => commands::cmd_area(&app, &name, json).await,
        Commands::Random { json } => commands::cmd_random(&app, json).await,
        Commands::Show { id, json } => commands::cmd_show(&app, &id, json).await,
        Commands::Categories { json } => commands::cmd_categories(&app, json).await,
        Commands::Areas { json } => commands::cmd_areas(&app, json).await,
        Commands::Favorite { id } => commands::cmd_favorite(&mut app, &id).await,
        Commands::Favorites { json } => commands::cmd_favorites(&app, json),
        Commands::Plan { command } => match command {
            PlanCommand::Add { id, date } => {
                commands::cmd_plan_add(&mut app, &id, date.as_deref()).await
            }
            PlanCommand::Remove { date, index } => {
                commands::cmd_plan_remove(&mut app, &date, index).await
            }
            PlanCommand::List { json } => commands::cmd_plan_list(&app, json),
            PlanCommand::Dates => {
                commands::cmd_plan_dates();
                Ok(())
            }
        },
        Commands::Rate { id, stars } => commands::cmd_rate(&mut app, &id, stars).await,
        Commands::Share {
            id,
            platform,
            open,
            copy,
        } => commands::cmd_share(&app, &id, platform, open, copy).await,
        Commands::Theme => commands::cmd_theme(&mut app).await,
    }
}
