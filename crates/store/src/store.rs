//! Typed snapshot access on top of a [`Backend`].
//!
//! Each collection lives under its own key as one serialized snapshot. Reads
//! return the whole snapshot (or the seed, if the key was never written);
//! saves replace the whole snapshot. There is no merging and no version
//! check: the last writer wins.
//!
//! Writes that must land together (the stock decrement and order insert of a
//! checkout) go through a [`WriteBatch`], which the backend applies
//! all-or-nothing. All writes are serialized by a process-local lock, and
//! [`Store::update`] holds that lock across a read-modify-write.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use tienda_core::{Category, Order, Product, Settings};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::seed::SeedData;

/// The four persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Products,
    Categories,
    Orders,
    Settings,
}

impl StoreKey {
    /// Every key.
    pub const ALL: [Self; 4] = [
        Self::Products,
        Self::Categories,
        Self::Orders,
        Self::Settings,
    ];

    /// The key the snapshot is stored under.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "ecommerce_products",
            Self::Categories => "ecommerce_categories",
            Self::Orders => "ecommerce_orders",
            Self::Settings => "ecommerce_settings",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshots to be written together.
///
/// Setting the same collection twice keeps the later snapshot.
#[derive(Debug, Default, Clone)]
pub struct WriteBatch {
    entries: Vec<(StoreKey, String)>,
}

impl WriteBatch {
    /// An empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the products snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the snapshot cannot be encoded.
    pub fn products(self, products: &[Product]) -> Result<Self, StoreError> {
        self.with(StoreKey::Products, &products)
    }

    /// Add the categories snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the snapshot cannot be encoded.
    pub fn categories(self, categories: &[Category]) -> Result<Self, StoreError> {
        self.with(StoreKey::Categories, &categories)
    }

    /// Add the orders snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the snapshot cannot be encoded.
    pub fn orders(self, orders: &[Order]) -> Result<Self, StoreError> {
        self.with(StoreKey::Orders, &orders)
    }

    /// Add the settings record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if the record cannot be encoded.
    pub fn settings(self, settings: &Settings) -> Result<Self, StoreError> {
        self.with(StoreKey::Settings, settings)
    }

    /// Collections touched by this batch.
    pub fn keys(&self) -> impl Iterator<Item = StoreKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    /// Whether the batch writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with<T: Serialize + ?Sized>(mut self, key: StoreKey, value: &T) -> Result<Self, StoreError> {
        let encoded = serde_json::to_string(value)?;
        self.entries.retain(|(existing, _)| *existing != key);
        self.entries.push((key, encoded));
        Ok(self)
    }
}

/// Handle to the four storefront collections.
///
/// Open one per process at startup and pass it to the services that need it;
/// call [`Store::close`] at shutdown.
#[derive(Debug)]
pub struct Store<B> {
    backend: B,
    seed: SeedData,
    write_lock: Mutex<()>,
}

impl<B: Backend> Store<B> {
    /// Wrap a backend, falling back to `seed` for collections never saved.
    pub const fn new(backend: B, seed: SeedData) -> Self {
        Self {
            backend,
            seed,
            write_lock: Mutex::new(()),
        }
    }

    /// The underlying backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// The seed used for fallback reads.
    pub const fn seed(&self) -> &SeedData {
        &self.seed
    }

    // -------------------------------------------------------------------------
    // Collections
    // -------------------------------------------------------------------------

    /// Current products snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored snapshot cannot be decoded.
    pub fn get_products(&self) -> Result<Vec<Product>, StoreError> {
        self.load(StoreKey::Products, || self.seed.products.clone())
    }

    /// Replace the products snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn save_products(&self, products: &[Product]) -> Result<(), StoreError> {
        self.commit(WriteBatch::new().products(products)?)
    }

    /// Current categories snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored snapshot cannot be decoded.
    pub fn get_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.load(StoreKey::Categories, || self.seed.categories.clone())
    }

    /// Replace the categories snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn save_categories(&self, categories: &[Category]) -> Result<(), StoreError> {
        self.commit(WriteBatch::new().categories(categories)?)
    }

    /// Current orders snapshot, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored snapshot cannot be decoded.
    pub fn get_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.load(StoreKey::Orders, || self.seed.orders.clone())
    }

    /// Replace the orders snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn save_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        self.commit(WriteBatch::new().orders(orders)?)
    }

    /// Current settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if the stored record cannot be decoded.
    pub fn get_settings(&self) -> Result<Settings, StoreError> {
        self.load(StoreKey::Settings, || self.seed.settings.clone())
    }

    /// Replace the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.commit(WriteBatch::new().settings(settings)?)
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Write every snapshot in `batch` at once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the write fails; no snapshot in the
    /// batch was written in that case.
    pub fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.update(|_| Ok(((), batch)))
    }

    /// Run a read-modify-write while holding the write lock.
    ///
    /// `f` reads whatever it needs through the store and returns a value
    /// plus the batch to write. The batch is committed before the lock is
    /// released; if `f` fails nothing is written. `f` must not call any
    /// `save_*` method, [`Store::commit`] or `update` itself.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or the backend error from the commit.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&Self) -> Result<(T, WriteBatch), StoreError>,
    ) -> Result<T, StoreError> {
        // The lock guards no data, so a poisoned lock is still a valid lock.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (value, batch) = f(self)?;
        self.write(&batch)?;
        Ok(value)
    }

    /// Drop every persisted snapshot so reads fall back to the seed again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the backend cannot be written.
    pub fn reset(&self) -> Result<(), StoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let keys = StoreKey::ALL.map(|key| key.as_str());
        self.backend.remove(&keys)?;
        tracing::info!("store reset to seed data");
        Ok(())
    }

    /// Persist the seed snapshots for every collection, replacing stored data.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn persist_seed(&self) -> Result<(), StoreError> {
        let batch = WriteBatch::new()
            .products(&self.seed.products)?
            .categories(&self.seed.categories)?
            .orders(&self.seed.orders)?
            .settings(&self.seed.settings)?;
        self.commit(batch)?;
        tracing::info!(
            products = self.seed.products.len(),
            categories = self.seed.categories.len(),
            orders = self.seed.orders.len(),
            "seed data persisted"
        );
        Ok(())
    }

    /// Whether `key` holds a persisted snapshot rather than falling back to seed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the backend cannot be read.
    pub fn is_persisted(&self, key: StoreKey) -> Result<bool, StoreError> {
        Ok(self.backend.read(key.as_str())?.is_some())
    }

    /// Flush the backend and release the handle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if flushing fails.
    pub fn close(self) -> Result<(), StoreError> {
        self.backend.flush()?;
        tracing::debug!("store closed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn load<T: DeserializeOwned>(
        &self,
        key: StoreKey,
        seed: impl FnOnce() -> T,
    ) -> Result<T, StoreError> {
        match self.backend.read(key.as_str())? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source })
            }
            None => {
                tracing::debug!(%key, "no persisted snapshot, using seed");
                Ok(seed())
            }
        }
    }

    fn write(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let entries: Vec<(&str, String)> = batch
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        self.backend.write_batch(&entries)?;
        Ok(())
    }
}
