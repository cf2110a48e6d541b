//! Ingredient read commands
//!
//! Usage: ambrosia ingredients list [--name <NAME>] [--owner <USER_ID>]
//!        ambrosia ingredients get <ID>

use super::{print_json, StoreArgs};
use ambrosia_core::filter::{Filters, IngredientFilter};
use ambrosia_store::RecipeCatalog;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct IngredientArgs {
    #[command(subcommand)]
    pub command: IngredientCommand,
}

#[derive(Debug, Subcommand)]
pub enum IngredientCommand {
    /// List ingredients, optionally filtered
    List(ListArgs),
    /// Show one ingredient by id
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Exact ingredient name
    #[arg(long)]
    pub name: Option<String>,

    /// Owning user id
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    pub id: String,
}

pub fn execute(store: &StoreArgs, args: IngredientArgs) -> anyhow::Result<()> {
    let catalog = RecipeCatalog::new(store.open()?);
    let ctx = store.context();

    match args.command {
        IngredientCommand::List(list) => {
            let mut filters = Filters::all();
            if let Some(name) = list.name {
                filters.push(IngredientFilter::Name(name))?;
            }
            if let Some(owner) = list.owner {
                filters.push(IngredientFilter::OwnerId(owner))?;
            }
            print_json(&catalog.ingredients(&ctx, &filters)?)
        }
        IngredientCommand::Get(get) => print_json(&catalog.ingredient(&ctx, &get.id)?),
    }
}
