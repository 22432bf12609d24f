//! Core types for the Tienda storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod models;
pub mod price;
pub mod status;

pub use id::*;
pub use models::{Category, Order, Product, Settings};
pub use price::Price;
pub use status::*;
