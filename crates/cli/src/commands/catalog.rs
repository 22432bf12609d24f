//! Catalog browsing commands.

use tienda_core::{CategoryId, ProductId};
use tienda_store::{Backend, Shop, StoreError};

use super::{CommandError, emit_yaml};

/// List products, optionally restricted to one category.
pub fn list<B: Backend>(shop: &Shop<B>, category: Option<&str>) -> Result<(), CommandError> {
    let catalog = shop.catalog();
    let currency = shop.settings().get()?.currency;
    let category = category.map(CategoryId::from);
    let products = catalog.products_in_category(category.as_ref())?;

    if products.is_empty() {
        tracing::info!("No products found");
        return Ok(());
    }

    for product in &products {
        let category_name = catalog
            .category_name(product)?
            .unwrap_or_else(|| "-".to_owned());
        let availability = if product.stock > 0 {
            format!("{} in stock", product.stock)
        } else {
            "sold out".to_owned()
        };
        tracing::info!(
            "{:<10} {:<28} {currency} {:>10}  {:<14} {category_name}",
            product.id,
            product.name,
            product.price,
            availability,
        );
    }
    Ok(())
}

/// Show one product in full.
pub fn show<B: Backend>(shop: &Shop<B>, id: &str) -> Result<(), CommandError> {
    let catalog = shop.catalog();
    let id = ProductId::from(id);
    let product = catalog
        .find_product(&id)?
        .ok_or(StoreError::ProductNotFound(id))?;

    emit_yaml(&product)?;
    if let Some(name) = catalog.category_name(&product)? {
        tracing::info!("category: {name}");
    }
    Ok(())
}
