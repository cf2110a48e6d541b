//! User read command
//!
//! Usage: ambrosia users get <ID>

use super::{print_json, StoreArgs};
use ambrosia_store::RecipeCatalog;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show one user by id
    Get(GetArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    pub id: String,
}

pub fn execute(store: &StoreArgs, args: UserArgs) -> anyhow::Result<()> {
    let catalog = RecipeCatalog::new(store.open()?);
    let ctx = store.context();

    match args.command {
        UserCommand::Get(get) => print_json(&catalog.user(&ctx, &get.id)?),
    }
}
