//! Vitrine CLI - a storefront client in the terminal.
//!
//! Cart and favorites state persists under the configured data directory,
//! so commands compose across invocations the way page loads compose in a
//! browser: anonymous actions stay on this machine, authenticated actions
//! sync against the remote API, and remote failures degrade instead of
//! losing the action.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (works offline from the last snapshot)
//! vitrine catalog
//!
//! # Cart operations, anonymous or signed in
//! vitrine cart add product 5 -q 2
//! vitrine cart list
//! vitrine cart set market_listing 3 1
//! vitrine cart clear
//!
//! # Session
//! vitrine login -e user@example.com -p secret
//! vitrine logout
//!
//! # Favorites (require a session)
//! vitrine favorites add product 5
//! vitrine favorites list
//!
//! # Checkout
//! vitrine checkout
//! vitrine orders
//! ```
//!
//! # Environment Variables
//!
//! - `VITRINE_API_URL` - Base URL of the remote storefront API
//! - `VITRINE_DATA_DIR` - Directory for persisted local state

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use vitrine_client::Storefront;
use vitrine_client::config::ClientConfig;
use vitrine_core::ItemKind;

mod commands;

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(author, version, about = "Vitrine storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and pull the remote favorites list
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
    /// Sign out (the cart stays on this machine)
    Logout,
    /// Show the current session
    Whoami,
    /// List the catalog, refreshing from the remote API when reachable
    Catalog {
        /// Records to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum records to list
        #[arg(long, default_value_t = 100)]
        limit: u32,

        /// Include inactive items
        #[arg(long)]
        all: bool,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Favorites operations (require a session)
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Snapshot the cart into the order history and clear it
    Checkout,
    /// List locally recorded orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add an item to the cart
    Add {
        /// Item kind (`product`, `market_listing`, `author_listing`)
        kind: ItemKind,

        /// Item id
        id: i32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// List cart entries
    List,
    /// Set the quantity of a cart entry (0 removes it)
    Set {
        /// Item kind (`product`, `market_listing`, `author_listing`)
        kind: ItemKind,

        /// Item id
        id: i32,

        /// New quantity
        quantity: u32,
    },
    /// Remove a cart entry
    Remove {
        /// Item kind (`product`, `market_listing`, `author_listing`)
        kind: ItemKind,

        /// Item id
        id: i32,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Favorite an item
    Add {
        /// Item kind (`product`, `market_listing`, `author_listing`)
        kind: ItemKind,

        /// Item id
        id: i32,
    },
    /// Unfavorite an item
    Remove {
        /// Item kind (`product`, `market_listing`, `author_listing`)
        kind: ItemKind,

        /// Item id
        id: i32,
    },
    /// List favorited items
    List,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

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
    let config = ClientConfig::from_env()?;
    let mut shop = Storefront::open(&config);
    shop.restore().await;

    match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&mut shop, &email, SecretString::from(password)).await?;
        }
        Commands::Register {
            email,
            password,
            name,
        } => {
            commands::session::register(&mut shop, &email, SecretString::from(password), &name)
                .await?;
        }
        Commands::Logout => commands::session::logout(&mut shop),
        Commands::Whoami => commands::session::whoami(&shop),
        Commands::Catalog { skip, limit, all } => {
            commands::catalog::list(&mut shop, skip, limit, !all).await;
        }
        Commands::Cart { action } => match action {
            CartAction::Add { kind, id, quantity } => {
                commands::cart::add(&mut shop, kind, id, quantity).await?;
            }
            CartAction::List => commands::cart::list(&shop),
            CartAction::Set { kind, id, quantity } => {
                commands::cart::set_quantity(&mut shop, kind, id, quantity).await?;
            }
            CartAction::Remove { kind, id } => {
                commands::cart::remove(&mut shop, kind, id).await?;
            }
            CartAction::Clear => commands::cart::clear(&mut shop).await?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Add { kind, id } => {
                commands::favorites::add(&mut shop, kind, id).await?;
            }
            FavoritesAction::Remove { kind, id } => {
                commands::favorites::remove(&mut shop, kind, id).await?;
            }
            FavoritesAction::List => commands::favorites::list(&shop),
        },
        Commands::Checkout => commands::cart::checkout(&mut shop).await?,
        Commands::Orders => commands::cart::orders(&shop),
    }
    Ok(())
}
