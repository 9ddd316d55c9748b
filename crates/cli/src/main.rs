//! Menen CLI - Command-line front end for the shopping cart.
//!
//! # Usage
//!
//! ```bash
//! # Add two mugs at $18.50 each
//! menen add 42 --title "Clay mug" --price 18.50 --quantity 2 --artisan "Amina K."
//!
//! # Change a quantity, checking stock with the backend first
//! menen set 42 3 --check-stock
//!
//! # Show the cart with its order summary
//! menen show
//!
//! # Place the order
//! menen checkout --shipping express --payment paypal
//! ```
//!
//! # Commands
//!
//! - `show` - List cart lines and the order summary
//! - `add` - Add an item (merges into an existing line)
//! - `remove` - Remove a line
//! - `set` - Set a line's quantity (0 removes)
//! - `clear` - Empty the cart
//! - `count` - Print the number of units in the cart
//! - `summary` - Print subtotal, shipping, tax and total
//! - `checkout` - Submit the cart as an order
//!
//! The cart is persisted in `MENEN_CART_DIR` between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use menen_core::CraftId;
use menen_storefront::checkout::{PaymentMethod, ShippingMethod};
use menen_storefront::config::StorefrontConfig;
use menen_storefront::error::AppError;
use menen_storefront::telemetry;
use rust_decimal::Decimal;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "menen")]
#[command(author, version, about = "Menen shopping cart")]
struct Cli {
    /// Log at debug level (overridden by `RUST_LOG`)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cart lines and the order summary
    Show,
    /// Add an item to the cart
    Add {
        /// Craft ID
        id: CraftId,

        /// Display title
        #[arg(short, long)]
        title: String,

        /// Unit price
        #[arg(short, long)]
        price: Decimal,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Artisan display name
        #[arg(long)]
        artisan: Option<String>,

        /// Refuse the add if the backend has fewer units in stock
        #[arg(long)]
        check_stock: bool,
    },
    /// Remove a line from the cart
    Remove {
        /// Craft ID
        id: CraftId,
    },
    /// Set a line's quantity (0 removes the line)
    Set {
        /// Craft ID
        id: CraftId,

        /// New quantity
        quantity: u32,

        /// Refuse the change if the backend has fewer units in stock
        #[arg(long)]
        check_stock: bool,
    },
    /// Empty the cart
    Clear,
    /// Print the number of units in the cart
    Count,
    /// Print subtotal, shipping, tax and total
    Summary {
        /// Quote a checkout shipping method instead of the flat rate
        #[arg(short, long)]
        shipping: Option<ShippingMethod>,
    },
    /// Submit the cart as an order
    Checkout {
        /// Shipping method (`standard`, `express`, `nextday`)
        #[arg(short, long, default_value_t = ShippingMethod::Standard)]
        shipping: ShippingMethod,

        /// Payment method (`card`, `paypal`, `apple`, `google`)
        #[arg(short, long, default_value_t = PaymentMethod::Card)]
        payment: PaymentMethod,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = StorefrontConfig::from_env();

    // Sentry must be initialised before the tracing subscriber
    let sentry_guard = config.as_ref().ok().and_then(telemetry::init_sentry);
    telemetry::init_tracing(default_log_filter(cli.verbose));
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(AppError::from(e)),
    };

    if let Err(e) = result {
        e.report();
        drop(sentry_guard);
        std::process::exit(1);
    }
}

/// Filter applied when `RUST_LOG` is unset. `menen` is this binary's target.
const fn default_log_filter(verbose: bool) -> &'static str {
    if verbose {
        "menen=debug,menen_storefront=debug"
    } else {
        "menen=info,menen_storefront=info"
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), AppError> {
    let mut store = commands::open_store(config);

    match cli.command {
        Commands::Show => commands::cart::show(&store, config),
        Commands::Add {
            id,
            title,
            price,
            quantity,
            image,
            artisan,
            check_stock,
        } => {
            let input = commands::cart::AddInput {
                id,
                title,
                price,
                quantity,
                image,
                artisan,
            };
            commands::cart::add(&mut store, config, input, check_stock).await?;
        }
        Commands::Remove { id } => commands::cart::remove(&mut store, &id),
        Commands::Set {
            id,
            quantity,
            check_stock,
        } => commands::cart::set(&mut store, config, &id, quantity, check_stock).await?,
        Commands::Clear => commands::cart::clear(&mut store),
        Commands::Count => commands::cart::count(&store),
        Commands::Summary { shipping } => commands::cart::summary(&store, config, shipping),
        Commands::Checkout { shipping, payment } => {
            commands::checkout::place(&mut store, config, shipping, payment).await?;
        }
    }
    Ok(())
}
