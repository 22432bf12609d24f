//! Checkout and tracking commands.

use tienda_core::{OrderStatus, PROGRESS_STEPS, ProductId, format_timestamp};
use tienda_store::{Backend, NewOrder, Shop, StoreError};

use super::CommandError;

/// Place an order and print the handoff link.
pub fn create<B: Backend>(
    shop: &Shop<B>,
    product: &str,
    quantity: u32,
    customer_name: String,
    customer_whatsapp: String,
) -> Result<(), CommandError> {
    let order = shop.orders().create_order(NewOrder {
        product_id: ProductId::from(product),
        quantity,
        customer_name,
        customer_whatsapp,
    })?;
    let currency = shop.settings().get()?.currency;

    tracing::info!("Order {} placed", order.id);
    tracing::info!("  {} x {}", order.quantity, order.product_name);
    tracing::info!("  Total: {currency} {}", order.total);
    tracing::info!("  Tracking: {}", shop.tracking_url(&order.id));
    tracing::info!("Send your order on WhatsApp:");
    tracing::info!("  {}", shop.contact_link(order.id.as_str())?);
    Ok(())
}

/// Show an order's progress.
pub fn track<B: Backend>(shop: &Shop<B>, id: &str) -> Result<(), CommandError> {
    let order = shop
        .orders()
        .find_order(id)?
        .ok_or_else(|| StoreError::OrderNotFound(id.to_owned()))?;
    let currency = shop.settings().get()?.currency;

    tracing::info!("Order #{}", order.id);
    tracing::info!("  Placed: {}", format_timestamp(&order.created_at));
    tracing::info!("  {} x {}", order.quantity, order.product_name);
    tracing::info!("  Total: {currency} {}", order.total);

    if order.status == OrderStatus::Cancelado {
        tracing::info!("  Status: {}", order.status.label());
        return Ok(());
    }

    let line: Vec<String> = OrderStatus::ALL
        .iter()
        .take(PROGRESS_STEPS)
        .map(|status| {
            let mark = if order.status.reached_step(status.step()) { "x" } else { " " };
            format!("[{mark}] {}", status.label())
        })
        .collect();
    tracing::info!("  {}", line.join("  "));
    tracing::info!("  Progress: {}%", order.status.progress_percent());
    Ok(())
}

/// Print the WhatsApp link for an existing order.
pub fn link<B: Backend>(shop: &Shop<B>, id: &str) -> Result<(), CommandError> {
    tracing::info!("{}", shop.contact_link(id)?);
    Ok(())
}
