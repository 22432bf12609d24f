//! Data file maintenance.

use tienda_store::{Backend, Shop};

use super::CommandError;

/// Drop every saved collection so reads fall back to the seed.
pub fn reset<B: Backend>(shop: &Shop<B>) -> Result<(), CommandError> {
    shop.store().reset()?;
    tracing::info!("Store reset; seed data will be served until the next save");
    Ok(())
}

/// Write the seed into the store, replacing saved data.
pub fn seed<B: Backend>(shop: &Shop<B>) -> Result<(), CommandError> {
    let seed = shop.store().seed();
    shop.store().persist_seed()?;
    tracing::info!(
        "Seeded {} products, {} categories, {} orders",
        seed.products.len(),
        seed.categories.len(),
        seed.orders.len()
    );
    Ok(())
}
