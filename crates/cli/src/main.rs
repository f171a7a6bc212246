//! PC House CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! pc-cli migrate
//!
//! # Grant the admin role to an existing user
//! pc-cli admin promote firebase-uid-123
//!
//! # Restock (or write off) a part
//! pc-cli stock adjust gpu-4070 25
//! pc-cli stock adjust gpu-4070 -3
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin promote` - Bootstrap or add admins
//! - `stock adjust` - Change a part's available quantity

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(author, version, about = "PC House CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage part stock
    Stock {
        #[command(subcommand)]
        action: StockAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to an existing user
    Promote {
        /// External identity of the user (must have signed in once)
        uid: String,
    },
}

#[derive(Subcommand)]
enum StockAction {
    /// Add a (possibly negative) delta to a part's available quantity
    Adjust {
        /// Business id of the part
        part_id: String,

        /// Quantity to add; negative values remove stock
        #[arg(allow_negative_numbers = true)]
        delta: i32,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Promote { uid } => commands::admin::promote(&uid).await?,
        },
        Commands::Stock { action } => match action {
            StockAction::Adjust { part_id, delta } => {
                commands::stock::adjust(&part_id, delta).await?;
            }
        },
    }
    Ok(())
}
