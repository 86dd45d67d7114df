//! Forkful CLI - Session store migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront session table
//! forkful-cli migrate
//!
//! # Insert the demo catalog into the data backend
//! forkful-cli seed
//!
//! # Override an order's status
//! forkful-cli orders set-status 4f9c2a1e-... delivering
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the `tower_sessions` schema in the storefront database
//! - `seed` - Insert demo categories, products, options and variations
//! - `orders set-status` - Write a new status straight to the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "forkful-cli")]
#[command(author, version, about = "Forkful CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storefront session store schema
    Migrate,
    /// Insert a demo catalog through the data backend
    Seed,
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Set an order's status (no transition checks)
    SetStatus {
        /// Order id (UUID)
        id: String,

        /// New status (`pending`, `awaiting_payment`, `processing`,
        /// `delivering`, `delivered`, `cancelled`)
        status: String,
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
        Commands::Migrate => commands::migrate::sessions().await?,
        Commands::Seed => commands::seed::demo_catalog().await?,
        Commands::Orders { action } => match action {
            OrdersAction::SetStatus { id, status } => {
                commands::orders::set_status(&id, &status).await?;
            }
        },
    }
    Ok(())
}
