//! Recipe read commands
//!
//! Usage: ambrosia recipes list [--name <NAME>] [--owner <USER_ID>] [--joined]
//!        ambrosia recipes get <ID>

use super::{print_json, StoreArgs};
use ambrosia_core::filter::{Filters, RecipeFilter};
use ambrosia_store::{HydrationStrategy, RecipeCatalog};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct RecipeArgs {
    #[command(subcommand)]
    pub command: RecipeCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecipeCommand {
    /// List recipes with their ingredients, optionally filtered
    List(ListArgs),
    /// Show one recipe by id
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Exact recipe name
    #[arg(long)]
    pub name: Option<String>,

    /// Owning user id
    #[arg(long)]
    pub owner: Option<String>,

    /// Hydrate with a single join query instead of one query per recipe
    #[arg(long)]
    pub joined: bool,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    pub id: String,
}

pub fn execute(store: &StoreArgs, args: RecipeArgs) -> anyhow::Result<()> {
    let ctx = store.context();

    match args.command {
        RecipeCommand::List(list) => {
            let strategy = if list.joined {
                HydrationStrategy::Joined
            } else {
                HydrationStrategy::PerRecipe
            };
            let catalog = RecipeCatalog::new(store.open()?).with_strategy(strategy);

            let mut filters = Filters::all();
            if let Some(name) = list.name {
                filters.push(RecipeFilter::Name(name))?;
            }
            if let Some(owner) = list.owner {
                filters.push(RecipeFilter::OwnerId(owner))?;
            }
            print_json(&catalog.recipes(&ctx, &filters)?)
        }
        RecipeCommand::Get(get) => {
            let catalog = RecipeCatalog::new(store.open()?);
            print_json(&catalog.recipe(&ctx, &get.id)?)
        }
    }
}
