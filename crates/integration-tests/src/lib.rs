//! Integration tests for Tienda.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tienda-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout` - order creation, stock and the WhatsApp handoff
//! - `order_status` - admin status changes and tracking lookups
//! - `persistence` - file-backed snapshots across reopen, reset and seeding
//!
//! Every test runs against its own [`TestContext`]: a temporary directory
//! holding a fresh data file, with a fixed clock and seeded ID generator.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use tienda_core::{FixedClock, IdGenerator, ProductId};
use tienda_store::{
    FileBackend, NewOrder, SeedData, Shop, ShopOptions, StockPolicy, Store, StoreError,
};

/// Timestamp every test order is created at.
#[must_use]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 14, 5, 0)
        .single()
        .unwrap_or_default()
}

/// A throwaway store on disk.
pub struct TestContext {
    dir: TempDir,
    seed: u64,
}

impl TestContext {
    /// Create a context with an empty temp directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the temp directory cannot be created.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
            seed: 42,
        })
    }

    /// The data file every shop in this context opens.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("tienda.json")
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Open a shop over the data file with the built-in seed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the data file cannot be opened.
    pub fn open(&mut self, policy: StockPolicy) -> Result<Shop<FileBackend>, StoreError> {
        self.open_with_seed(policy, SeedData::builtin())
    }

    /// Open a shop over the data file with the given seed.
    ///
    /// Each call uses a different ID generator seed so reopened shops do not
    /// replay the same IDs.
    ///
    /// # Errors
    ///
    /// Returns a store error if the data file cannot be opened.
    pub fn open_with_seed(
        &mut self,
        policy: StockPolicy,
        seed: SeedData,
    ) -> Result<Shop<FileBackend>, StoreError> {
        self.seed += 1;
        let backend = FileBackend::open(self.data_path())?;
        Ok(Shop::new(
            Store::new(backend, seed),
            Box::new(FixedClock(test_now())),
            IdGenerator::seeded(self.seed),
            ShopOptions {
                stock_policy: policy,
                ..ShopOptions::default()
            },
        ))
    }
}

/// Checkout request for `product_id` from the reference customer.
#[must_use]
pub fn new_order(product_id: &str, quantity: u32) -> NewOrder {
    NewOrder {
        product_id: ProductId::new(product_id),
        quantity,
        customer_name: "Juan".to_owned(),
        customer_whatsapp: "59170000000".to_owned(),
    }
}

/// Raw contents of the data file, parsed as a JSON object.
///
/// # Errors
///
/// Returns an error if the file is missing or not JSON.
pub fn read_document(path: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
