//! Seed import command
//!
//! Usage: ambrosia seed import <PATH>

use super::{print_json, StoreArgs};
use ambrosia_store::seed::{import_seed, ImportSummary};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file (or every .yaml/.yml file in a directory)
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

pub fn execute(store: &StoreArgs, args: SeedArgs) -> anyhow::Result<()> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(store, import_args),
    }
}

fn execute_import(store: &StoreArgs, args: ImportArgs) -> anyhow::Result<()> {
    let pool = store.open()?;

    let seed_files = if args.path.is_dir() {
        // Sorted so directory imports are deterministic
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    let mut summaries: Vec<ImportSummary> = Vec::with_capacity(seed_files.len());
    for seed_file in &seed_files {
        tracing::info!(path = %seed_file.display(), "importing seed");
        summaries.push(pool.with_connection(|conn| import_seed(seed_file, conn))?);
    }

    print_json(&summaries)
}
