//! Ambrosia CLI
//!
//! Command-line interface for the recipe catalog

use ambrosia_core::logging_facility;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ambrosia")]
#[command(about = "Ambrosia - recipe and ingredient catalog", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: commands::StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Read ingredients
    Ingredients(commands::ingredients::IngredientArgs),
    /// Read recipes with their ingredients
    Recipes(commands::recipes::RecipeArgs),
    /// Read users
    Users(commands::users::UserArgs),
}

fn main() {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging_facility::init(cli.store.log_format.into());

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&cli.store),
        Commands::Seed(args) => commands::seed::execute(&cli.store, args),
        Commands::Ingredients(args) => commands::ingredients::execute(&cli.store, args),
        Commands::Recipes(args) => commands::recipes::execute(&cli.store, args),
        Commands::Users(args) => commands::users::execute(&cli.store, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
