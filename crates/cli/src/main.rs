//! Veilbound CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! vb-cli migrate
//!
//! # Seed the launch merch line
//! vb-cli seed merch
//!
//! # Seed merch from a YAML file (validate only)
//! vb-cli seed merch --file seeds/merch.yaml --dry-run
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed merch` - Insert merch products that are not already in the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vb-cli")]
#[command(author, version, about = "Veilbound storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed catalog data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed merch products
    Merch {
        /// YAML file of merch records (defaults to the launch merch line)
        #[arg(short, long)]
        file: Option<String>,

        /// Validate and report without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Merch { file, dry_run } => {
                commands::seed::merch(file.as_deref(), dry_run).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_args() {
        let cli = Cli::parse_from(["vb-cli", "seed", "merch", "--file", "m.yaml", "--dry-run"]);
        assert!(matches!(
            cli.command,
            Commands::Seed {
                target: SeedTarget::Merch { file: Some(ref f), dry_run: true }
            } if f == "m.yaml"
        ));
    }
}
