//! Seed fixtures.
//!
//! When a collection has never been saved, reads fall back to the seed. The
//! seed is never written back on its own: a store that has not persisted a
//! collection picks up new fixtures on upgrade, while one that has keeps its
//! own data.

use std::path::Path;

use serde::Deserialize;

use tienda_core::{Category, CategoryId, Order, Price, Product, ProductId, Settings};

use crate::error::SeedError;

/// Default contents for the four collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub settings: Settings,
}

/// On-disk fixture file. Sections left out fall back to the built-in seed.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    products: Option<Vec<Product>>,
    categories: Option<Vec<Category>>,
    orders: Option<Vec<Order>>,
    settings: Option<Settings>,
}

impl SeedData {
    /// The fixtures the storefront ships with: three categories, three
    /// products, no orders and default settings.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            products: builtin_products(),
            categories: builtin_categories(),
            orders: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// A seed with no products, categories or orders.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            products: Vec::new(),
            categories: Vec::new(),
            orders: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Parse fixtures from YAML.
    ///
    /// ```yaml
    /// categories:
    ///   - { id: cat1, name: Electrónica }
    /// settings:
    ///   storeName: Mi Tienda
    ///   adminPassword: s3cret
    ///   whatsappNumber: "59171234567"
    ///   currency: Bs
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Yaml`] if the document does not match the seed layout.
    pub fn from_yaml(source: &str) -> Result<Self, SeedError> {
        let file: SeedFile = serde_yaml::from_str(source)?;
        let builtin = Self::builtin();

        Ok(Self {
            products: file.products.unwrap_or(builtin.products),
            categories: file.categories.unwrap_or(builtin.categories),
            orders: file.orders.unwrap_or(builtin.orders),
            settings: file.settings.unwrap_or(builtin.settings),
        })
    }

    /// Read and parse a YAML fixture file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, or
    /// [`SeedError::Yaml`] if it does not match the seed layout.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SeedError> {
        let source = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_categories() -> Vec<Category> {
    [("cat1", "Electrónica"), ("cat2", "Hogar"), ("cat3", "Moda")]
        .into_iter()
        .map(|(id, name)| Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
        })
        .collect()
}

fn builtin_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("prod1"),
            name: "Smartphone Galaxy S23".to_owned(),
            description: "Última tecnología con cámara de 50MP y pantalla AMOLED.".to_owned(),
            price: Price::from_units(4500),
            stock: 10,
            category_id: CategoryId::new("cat1"),
            image_url: "https://picsum.photos/seed/phone/400/400".to_owned(),
        },
        Product {
            id: ProductId::new("prod2"),
            name: "Cafetera Expresso Pro".to_owned(),
            description: "Café de calidad barista en la comodidad de tu casa.".to_owned(),
            price: Price::from_units(1200),
            stock: 5,
            category_id: CategoryId::new("cat2"),
            image_url: "https://picsum.photos/seed/coffee/400/400".to_owned(),
        },
        Product {
            id: ProductId::new("prod3"),
            name: "Reloj Inteligente Ultra".to_owned(),
            description: "Seguimiento de salud avanzado y notificaciones en tiempo real."
                .to_owned(),
            price: Price::from_units(850),
            stock: 15,
            category_id: CategoryId::new("cat1"),
            image_url: "https://picsum.photos/seed/watch/400/400".to_owned(),
        },
    ]
}
