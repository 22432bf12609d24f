//! The assembled storefront: one store plus the services that act on it.

use tienda_core::{Clock, ContactLinkBuilder, IdGenerator, OrderId, SystemClock};

use crate::backend::{Backend, FileBackend};
use crate::catalog::CatalogService;
use crate::config::{DEFAULT_TRACKING_BASE_URL, StoreConfig};
use crate::error::StoreError;
use crate::orders::{OrderService, StockPolicy};
use crate::seed::SeedData;
use crate::settings::{AdminGate, SettingsService};
use crate::store::Store;

/// Behavior knobs that are not part of the stored settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopOptions {
    pub stock_policy: StockPolicy,
    pub tracking_base_url: String,
}

impl Default for ShopOptions {
    fn default() -> Self {
        Self {
            stock_policy: StockPolicy::default(),
            tracking_base_url: DEFAULT_TRACKING_BASE_URL.to_owned(),
        }
    }
}

impl From<&StoreConfig> for ShopOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            stock_policy: config.stock_policy,
            tracking_base_url: config.tracking_base_url.clone(),
        }
    }
}

/// Owns the store, the clock and the ID source, and hands out services
/// borrowing them.
pub struct Shop<B> {
    store: Store<B>,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
    options: ShopOptions,
}

impl Shop<FileBackend> {
    /// Open the file-backed store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Seed`] if the configured seed file cannot be
    /// loaded, or [`StoreError::Backend`] if the data file cannot be opened.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let seed = match &config.seed_file {
            Some(path) => SeedData::from_yaml_file(path)?,
            None => SeedData::builtin(),
        };
        let backend = FileBackend::open(&config.data_path)?;

        tracing::info!(
            path = %config.data_path.display(),
            stock_policy = %config.stock_policy,
            "store opened"
        );

        Ok(Self::new(
            Store::new(backend, seed),
            Box::new(SystemClock),
            IdGenerator::from_entropy(),
            ShopOptions::from(config),
        ))
    }
}

impl<B: Backend> Shop<B> {
    #[must_use]
    pub fn new(
        store: Store<B>,
        clock: Box<dyn Clock>,
        ids: IdGenerator,
        options: ShopOptions,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            options,
        }
    }

    pub fn orders(&self) -> OrderService<'_, B> {
        OrderService::new(
            &self.store,
            self.clock.as_ref(),
            &self.ids,
            self.options.stock_policy,
        )
    }

    pub fn catalog(&self) -> CatalogService<'_, B> {
        CatalogService::new(&self.store, &self.ids)
    }

    pub fn settings(&self) -> SettingsService<'_, B> {
        SettingsService::new(&self.store)
    }

    pub fn admin_gate(&self) -> AdminGate<'_, B> {
        AdminGate::new(&self.store, self.clock.as_ref())
    }

    /// Tracking link for an order ID, whether or not the order exists.
    #[must_use]
    pub fn tracking_url(&self, order_id: &OrderId) -> String {
        ContactLinkBuilder::new(&self.options.tracking_base_url, "").tracking_url(order_id)
    }

    /// The chat link a customer opens after checkout, addressed to the
    /// store's number and quoting the order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no order matches `order_id`,
    /// or a storage error if orders or settings cannot be read.
    pub fn contact_link(&self, order_id: &str) -> Result<String, StoreError> {
        let order = self
            .orders()
            .find_order(order_id)?
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_owned()))?;
        let settings = self.store.get_settings()?;

        Ok(
            ContactLinkBuilder::new(&self.options.tracking_base_url, &settings.currency)
                .contact_link(&order, &settings.whatsapp_number),
        )
    }

    #[must_use]
    pub const fn store(&self) -> &Store<B> {
        &self.store
    }

    #[must_use]
    pub const fn options(&self) -> &ShopOptions {
        &self.options
    }

    /// Flush and release the store.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the final flush fails.
    pub fn close(self) -> Result<(), StoreError> {
        self.store.close()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tienda_core::{FixedClock, ProductId};

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::orders::NewOrder;

    fn shop() -> Shop<MemoryBackend> {
        Shop::new(
            Store::new(MemoryBackend::new(), SeedData::builtin()),
            Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap())),
            IdGenerator::seeded(5),
            ShopOptions::default(),
        )
    }

    #[test]
    fn test_contact_link_quotes_order() {
        let shop = shop();
        let order = shop
            .orders()
            .create_order(NewOrder {
                product_id: ProductId::new("prod1"),
                quantity: 2,
                customer_name: "Ana".to_owned(),
                customer_whatsapp: "70000000".to_owned(),
            })
            .unwrap();

        let link = shop.contact_link(&order.id.as_str().to_lowercase()).unwrap();
        assert!(link.starts_with("https://wa.me/59170000000?text="));
        assert!(link.contains(order.id.as_str()));
        assert!(link.contains("9000"));
    }

    #[test]
    fn test_contact_link_unknown_order() {
        let shop = shop();
        assert!(matches!(
            shop.contact_link("NOPE").unwrap_err(),
            StoreError::OrderNotFound(_)
        ));
    }

    #[test]
    fn test_tracking_url() {
        let shop = shop();
        assert_eq!(
            shop.tracking_url(&OrderId::new("ABC123XYZ")),
            "http://localhost:3000/#/tracking/ABC123XYZ"
        );
    }

    #[test]
    fn test_open_with_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let seed_path = dir.path().join("seed.yaml");
        std::fs::write(&seed_path, "categories:\n  - id: c9\n    name: Libros\n").unwrap();

        let config = StoreConfig {
            data_path: dir.path().join("tienda.json"),
            seed_file: Some(seed_path),
            ..StoreConfig::default()
        };
        let shop = Shop::open(&config).unwrap();

        let categories = shop.catalog().list_categories().unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(shop.catalog().list_products().unwrap().len(), 3);
        shop.close().unwrap();
    }

    #[test]
    fn test_open_with_missing_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_path: dir.path().join("tienda.json"),
            seed_file: Some(dir.path().join("absent.yaml")),
            ..StoreConfig::default()
        };
        assert!(matches!(
            Shop::open(&config).err().unwrap(),
            StoreError::Seed(_)
        ));
    }
}
