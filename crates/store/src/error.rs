//! Error types for storage and the services built on it.
//!
//! Every error here is recoverable by the caller: show a message, let the
//! user fix the input or the data, try again. Nothing is retried
//! automatically.

use std::path::PathBuf;

use thiserror::Error;

use tienda_core::{CategoryId, ProductId};

use crate::store::StoreKey;

/// Errors raised by a [`Backend`](crate::backend::Backend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing document is not a valid key-value map.
    #[error("corrupt store document {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading seed fixtures.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid seed data: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised by the store and the order, catalog and settings services.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("storage error: {0}")]
    Backend(#[from] BackendError),

    /// A persisted snapshot could not be decoded.
    #[error("corrupt snapshot under {key}: {source}")]
    Corrupt {
        key: StoreKey,
        #[source]
        source: serde_json::Error,
    },

    /// A snapshot could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Seed fixtures could not be loaded.
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),

    /// No product with this ID exists in the current snapshot.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// No order matches this ID.
    #[error("order not found: {0}")]
    OrderNotFound(String),

    /// No category with this ID exists in the current snapshot.
    #[error("category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// Input rejected before anything was written.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The order asks for more units than are in stock.
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: i64,
    },

    /// Every generated ID collided with an existing one.
    #[error("could not generate a unique {entity} id")]
    IdExhausted { entity: &'static str },
}

impl StoreError {
    /// Shorthand for a [`StoreError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error is about the caller's request rather than the data.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound(_)
                | Self::OrderNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::Validation(_)
                | Self::InsufficientStock { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::ProductNotFound(ProductId::new("prod9"));
        assert_eq!(err.to_string(), "product not found: prod9");

        let err = StoreError::validation("quantity must be at least 1");
        assert_eq!(err.to_string(), "validation failed: quantity must be at least 1");

        let err = StoreError::InsufficientStock {
            product_id: ProductId::new("prod2"),
            requested: 6,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for prod2: requested 6, available 5"
        );
    }

    #[test]
    fn test_corrupt_error_names_the_key() {
        let source = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err = StoreError::Corrupt {
            key: StoreKey::Orders,
            source,
        };
        assert!(err.to_string().starts_with("corrupt snapshot under ecommerce_orders"));
    }

    #[test]
    fn test_is_user_error() {
        assert!(StoreError::OrderNotFound("X".to_owned()).is_user_error());
        assert!(StoreError::validation("bad").is_user_error());
        assert!(!StoreError::IdExhausted { entity: "order" }.is_user_error());
    }
}
