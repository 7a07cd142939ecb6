//! Garden Records CLI - session migrations, catalog checks and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table used for carts
//! gr-cli migrate
//!
//! # Validate the product catalog
//! gr-cli catalog check --path crates/storefront/content/products.json
//!
//! # Drive a cart stored in a dumped local-storage file
//! gr-cli cart --storage storage.json add 1 139.99 --name "Abbey Road"
//! gr-cli cart --storage storage.json qty 1 -1
//! gr-cli cart --storage storage.json show
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the session store table
//! - `catalog check` - Load and summarize the catalog
//! - `cart` - Show or mutate a cart in a JSON storage file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use garden_records_core::DEFAULT_CART_KEY;

mod commands;

#[derive(Parser)]
#[command(name = "gr-cli")]
#[command(author, version, about = "Garden Records CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session store table
    Migrate,
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show or change a cart kept in a JSON storage file
    Cart {
        /// JSON object file holding the key-value storage
        #[arg(short, long)]
        storage: PathBuf,

        /// Key the cart is stored under
        #[arg(short, long, default_value = DEFAULT_CART_KEY)]
        key: String,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load the catalog and report what it contains
    Check {
        /// Catalog file (defaults to `STOREFRONT_CATALOG_PATH`)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart lines and total
    Show,
    /// Add a product, merging with an existing line
    Add {
        /// Product id
        #[arg(allow_hyphen_values = true)]
        id: i64,

        /// Unit price
        #[arg(allow_hyphen_values = true)]
        price: f64,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Category label (e.g. Vinyl)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Image URL
        #[arg(short, long)]
        image: Option<String>,

        /// Quantity to add
        #[arg(short, long)]
        quantity: Option<i64>,
    },
    /// Change a line's quantity by a delta
    Qty {
        /// Product id
        id: i64,

        /// Change to apply (e.g. 1 or -1)
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove a line
    Remove {
        /// Product id
        id: i64,
    },
    /// Empty the cart
    Clear,
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
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(path)?,
        },
        Commands::Cart {
            storage,
            key,
            action,
        } => {
            let command = match action {
                CartAction::Show => commands::cart::CartCommand::Show,
                CartAction::Add {
                    id,
                    price,
                    name,
                    kind,
                    image,
                    quantity,
                } => {
                    let mut candidate = garden_records_core::CartCandidate::new(id, price);
                    candidate.name = name;
                    candidate.kind = kind;
                    candidate.image_url = image;
                    candidate.quantity = quantity;
                    commands::cart::CartCommand::Add(candidate)
                }
                CartAction::Qty { id, delta } => commands::cart::CartCommand::Qty { id, delta },
                CartAction::Remove { id } => commands::cart::CartCommand::Remove { id },
                CartAction::Clear => commands::cart::CartCommand::Clear,
            };
            commands::cart::run(&storage, &key, command)?;
        }
    }
    Ok(())
}
