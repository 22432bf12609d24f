//! Password-gated admin commands.
//!
//! # Usage
//!
//! ```bash
//! tienda admin -p admin123 orders
//! tienda admin status K3X9PQ2ZA en_camino
//! tienda admin product save --name "Licuadora" --price 350 --stock 8 --category cat2
//! tienda admin category save --id cat3 "Ropa"
//! tienda admin settings set --whatsapp-number 59171234567
//! ```
//!
//! # Environment Variables
//!
//! - `TIENDA_ADMIN_PASSWORD` - Used when `--password` is not given

use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Serialize;

use tienda_core::{CategoryId, OrderStatus, Price, ProductId, Settings, format_timestamp};
use tienda_store::{AdminSession, Backend, ProductDraft, Shop, StoreConfig};

use super::{CommandError, emit_yaml};

/// Product fields as given on the command line.
pub struct ProductArgs {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i64,
    pub category: String,
    pub image_url: Option<String>,
}

/// Settings fields to change; `None` keeps the stored value.
pub struct SettingsArgs {
    pub store_name: Option<String>,
    pub admin_password: Option<String>,
    pub whatsapp_number: Option<String>,
    pub currency: Option<String>,
}

/// Settings as shown to the operator, password redacted.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView<'a> {
    store_name: &'a str,
    admin_password: &'static str,
    whatsapp_number: &'a str,
    currency: &'a str,
}

/// Check the admin password from `--password`, falling back to the environment.
pub fn authenticate<B: Backend>(
    shop: &Shop<B>,
    config: &StoreConfig,
    password: Option<String>,
) -> Result<AdminSession, CommandError> {
    let candidate = match password {
        Some(password) => SecretString::from(password),
        None => config.require_admin_password()?.clone(),
    };

    shop.admin_gate()
        .verify(&candidate)?
        .ok_or(CommandError::Unauthorized)
}

/// List all orders, newest first.
pub fn orders<B: Backend>(shop: &Shop<B>) -> Result<(), CommandError> {
    let orders = shop.orders().list_orders()?;
    let currency = shop.settings().get()?.currency;

    if orders.is_empty() {
        tracing::info!("No orders yet");
        return Ok(());
    }

    for order in &orders {
        tracing::info!(
            "{:<10} {:<17} {:<20} {:<14} {:>3} x {:<24} {currency} {:>9}  {}",
            order.id,
            format_timestamp(&order.created_at),
            order.customer_name,
            order.customer_whatsapp,
            order.quantity,
            order.product_name,
            order.total,
            order.status.label(),
        );
    }
    tracing::info!("{} orders", orders.len());
    Ok(())
}

/// Set an order's status.
pub fn set_status<B: Backend>(
    shop: &Shop<B>,
    id: &str,
    status: OrderStatus,
) -> Result<(), CommandError> {
    let order = shop.orders().update_order_status(id, status)?;
    tracing::info!("Order {} is now {}", order.id, order.status.label());
    Ok(())
}

/// Create or replace a product.
pub fn save_product<B: Backend>(shop: &Shop<B>, args: ProductArgs) -> Result<(), CommandError> {
    let product = shop.catalog().save_product(ProductDraft {
        id: args.id.map(ProductId::from),
        name: args.name,
        description: args.description,
        price: Price::new(args.price),
        stock: args.stock,
        category_id: CategoryId::from(args.category),
        image_url: args.image_url,
    })?;
    emit_yaml(&product)
}

/// Delete a product.
pub fn delete_product<B: Backend>(shop: &Shop<B>, id: &str) -> Result<(), CommandError> {
    let removed = shop.catalog().delete_product(&ProductId::from(id))?;
    tracing::info!("Deleted {} ({})", removed.id, removed.name);
    Ok(())
}

/// Create or rename a category.
pub fn save_category<B: Backend>(
    shop: &Shop<B>,
    id: Option<String>,
    name: &str,
) -> Result<(), CommandError> {
    let category = shop
        .catalog()
        .save_category(id.map(CategoryId::from), name)?;
    tracing::info!("Saved category {} ({})", category.id, category.name);
    Ok(())
}

/// Delete a category. Its products are left in place.
pub fn delete_category<B: Backend>(shop: &Shop<B>, id: &str) -> Result<(), CommandError> {
    let catalog = shop.catalog();
    let removed = catalog.delete_category(&CategoryId::from(id))?;
    let orphaned = catalog.products_in_category(Some(&removed.id))?.len();

    tracing::info!("Deleted category {} ({})", removed.id, removed.name);
    if orphaned > 0 {
        tracing::warn!("{orphaned} products still reference {}", removed.id);
    }
    Ok(())
}

/// Show current settings.
pub fn show_settings<B: Backend>(shop: &Shop<B>) -> Result<(), CommandError> {
    let settings = shop.settings().get()?;
    emit_yaml(&SettingsView {
        store_name: &settings.store_name,
        admin_password: "[REDACTED]",
        whatsapp_number: &settings.whatsapp_number,
        currency: &settings.currency,
    })
}

/// Change settings, keeping any field not given.
pub fn update_settings<B: Backend>(shop: &Shop<B>, args: SettingsArgs) -> Result<(), CommandError> {
    let service = shop.settings();
    let current = service.get()?;

    let saved = service.save(Settings {
        store_name: args.store_name.unwrap_or(current.store_name),
        admin_password: args.admin_password.unwrap_or(current.admin_password),
        whatsapp_number: args.whatsapp_number.unwrap_or(current.whatsapp_number),
        currency: args.currency.unwrap_or(current.currency),
    })?;
    tracing::info!("Settings saved for {}", saved.store_name);
    Ok(())
}
