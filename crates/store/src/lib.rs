//! Tienda store library.
//!
//! Everything that touches persisted state lives here:
//! - [`backend`] - flat key-value backends (in-memory and single JSON file)
//! - [`store`] - typed, whole-collection snapshots over a backend
//! - [`orders`] - checkout, status changes and order lookup
//! - [`catalog`] - product and category browsing and admin edits
//! - [`settings`] - store settings and the admin password gate
//! - [`shop`] - the assembled storefront handed to front ends
//!
//! # Concurrency
//!
//! Writers within one process are serialized by the store's write lock.
//! Separate processes sharing a data file are not coordinated; the last
//! writer wins.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod orders;
pub mod seed;
pub mod settings;
pub mod shop;
pub mod store;

pub use backend::{Backend, FileBackend, MemoryBackend};
pub use catalog::{CatalogService, DEFAULT_IMAGE_URL, ProductDraft};
pub use config::{ConfigError, StoreConfig};
pub use error::{BackendError, SeedError, StoreError};
pub use orders::{NewOrder, OrderService, StockPolicy};
pub use seed::SeedData;
pub use settings::{AdminGate, AdminSession, SettingsService};
pub use shop::{Shop, ShopOptions};
pub use store::{Store, StoreKey, WriteBatch};
