//! Tienda CLI - storefront, checkout and admin tools over the local store.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! tienda catalog list --category cat1
//! tienda catalog show prod1
//!
//! # Place an order and get the WhatsApp handoff link
//! tienda order create prod1 --qty 2 --name "Juan" --whatsapp 59170000000
//! tienda order link K3X9PQ2ZA
//!
//! # Admin (password from --password or TIENDA_ADMIN_PASSWORD)
//! tienda admin orders
//! tienda admin status K3X9PQ2ZA entregado
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and inspect products
//! - `order` - Checkout and tracking
//! - `admin` - Orders, products, categories and settings (password-gated)
//! - `store` - Reset to or persist the seed data
//!
//! # Environment Variables
//!
//! See [`tienda_store::config`]. `RUST_LOG` overrides the log filter and
//! `TIENDA_LOG_FORMAT=json` switches to JSON log lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tienda_core::OrderStatus;
use tienda_store::{Shop, StoreConfig};

mod commands;

#[derive(Parser)]
#[command(name = "tienda")]
#[command(author, version, about = "Tienda storefront tools")]
struct Cli {
    /// Override the data file (`TIENDA_DATA_PATH`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Place and track orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Store administration
    Admin {
        /// Admin password (falls back to `TIENDA_ADMIN_PASSWORD`)
        #[arg(short, long, global = true)]
        password: Option<String>,

        #[command(subcommand)]
        action: AdminAction,
    },
    /// Manage the data file itself
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, optionally in one category
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product
    Show { id: String },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Place an order
    Create {
        /// Product ID
        product: String,

        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer WhatsApp number
        #[arg(short, long)]
        whatsapp: String,
    },
    /// Show an order's progress
    Track { id: String },
    /// Print the WhatsApp link for an order
    Link { id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List all orders, newest first
    Orders,
    /// Set an order's status (`en_espera`, `aceptado`, `en_camino`, `entregado`, `cancelado`)
    Status { id: String, status: OrderStatus },
    /// Create, edit or delete products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Create, rename or delete categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Show or change store settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a product, or replace one with --id
    Save {
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        stock: i64,

        #[arg(short, long)]
        category: String,

        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a category, or rename one with --id
    Save {
        #[arg(long)]
        id: Option<String>,

        name: String,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,
    /// Change settings; omitted fields keep their value
    Set {
        #[arg(long)]
        store_name: Option<String>,

        #[arg(long)]
        admin_password: Option<String>,

        #[arg(long)]
        whatsapp_number: Option<String>,

        #[arg(long)]
        currency: Option<String>,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Drop all saved data so reads fall back to the seed
    Reset,
    /// Write the seed data into the store, replacing what is there
    Seed {
        /// YAML fixture file (defaults to `TIENDA_SEED_FILE` or the built-in seed)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tienda_store=info,tienda_cli=info".into());

    let json = std::env::var("TIENDA_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
            .init();
    }
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env()?;
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Commands::Store {
        action: StoreAction::Seed { file: Some(file) },
    } = &cli.command
    {
        config.seed_file = Some(file.clone());
    }

    let shop = Shop::open(&config)?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category } => {
                commands::catalog::list(&shop, category.as_deref())?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&shop, &id)?,
        },
        Commands::Order { action } => match action {
            OrderAction::Create {
                product,
                qty,
                name,
                whatsapp,
            } => commands::order::create(&shop, &product, qty, name, whatsapp)?,
            OrderAction::Track { id } => commands::order::track(&shop, &id)?,
            OrderAction::Link { id } => commands::order::link(&shop, &id)?,
        },
        Commands::Admin { password, action } => {
            let session = commands::admin::authenticate(&shop, &config, password)?;
            tracing::debug!(at = %session.authenticated_at(), "admin session opened");
            match action {
                AdminAction::Orders => commands::admin::orders(&shop)?,
                AdminAction::Status { id, status } => {
                    commands::admin::set_status(&shop, &id, status)?;
                }
                AdminAction::Product { action } => match action {
                    ProductAction::Save {
                        id,
                        name,
                        description,
                        price,
                        stock,
                        category,
                        image_url,
                    } => commands::admin::save_product(
                        &shop,
                        commands::admin::ProductArgs {
                            id,
                            name,
                            description,
                            price,
                            stock,
                            category,
                            image_url,
                        },
                    )?,
                    ProductAction::Delete { id } => commands::admin::delete_product(&shop, &id)?,
                },
                AdminAction::Category { action } => match action {
                    CategoryAction::Save { id, name } => {
                        commands::admin::save_category(&shop, id, &name)?;
                    }
                    CategoryAction::Delete { id } => {
                        commands::admin::delete_category(&shop, &id)?;
                    }
                },
                AdminAction::Settings { action } => match action {
                    SettingsAction::Show => commands::admin::show_settings(&shop)?,
                    SettingsAction::Set {
                        store_name,
                        admin_password,
                        whatsapp_number,
                        currency,
                    } => commands::admin::update_settings(
                        &shop,
                        commands::admin::SettingsArgs {
                            store_name,
                            admin_password,
                            whatsapp_number,
                            currency,
                        },
                    )?,
                },
            }
        }
        Commands::Store { action } => match action {
            StoreAction::Reset => commands::store::reset(&shop)?,
            StoreAction::Seed { .. } => commands::store::seed(&shop)?,
        },
    }

    shop.close()?;
    Ok(())
}
