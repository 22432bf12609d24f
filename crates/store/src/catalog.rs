//! Catalog browsing and admin maintenance of products and categories.

use tienda_core::{Category, CategoryId, IdGenerator, Price, Product, ProductId};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::store::{Store, WriteBatch};

/// Placeholder image for products created without one.
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/400/400";

/// Admin product form. `id: None` creates a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: i64,
    pub category_id: CategoryId,
    pub image_url: Option<String>,
}

impl ProductDraft {
    fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::validation("product name is required"));
        }
        if self.price.is_negative() {
            return Err(StoreError::validation("price cannot be negative"));
        }
        if self.stock < 0 {
            return Err(StoreError::validation("stock cannot be negative"));
        }
        Ok(())
    }

    fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name.trim().to_owned(),
            description: self.description,
            price: self.price,
            stock: self.stock,
            category_id: self.category_id,
            image_url: self
                .image_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_owned()),
        }
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            image_url: Some(product.image_url),
        }
    }
}

/// Product and category operations over a [`Store`].
pub struct CatalogService<'a, B> {
    store: &'a Store<B>,
    ids: &'a IdGenerator,
}

impl<'a, B: Backend> CatalogService<'a, B> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(store: &'a Store<B>, ids: &'a IdGenerator) -> Self {
        Self { store, ids }
    }

    // =========================================================================
    // Browsing
    // =========================================================================

    /// Every product, in stored order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the products snapshot cannot be read.
    pub fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.store.get_products()
    }

    /// Products in one category, or all of them when `category` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the products snapshot cannot be read.
    pub fn products_in_category(
        &self,
        category: Option<&CategoryId>,
    ) -> Result<Vec<Product>, StoreError> {
        let mut products = self.store.get_products()?;
        if let Some(category) = category {
            products.retain(|p| &p.category_id == category);
        }
        Ok(products)
    }

    /// Look a product up by exact ID.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the products snapshot cannot be read.
    pub fn find_product(&self, id: &ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.store.get_products()?.into_iter().find(|p| &p.id == id))
    }

    /// The advisory stock check the product page runs before checkout.
    ///
    /// Checkout itself applies the configured
    /// [`StockPolicy`](crate::StockPolicy); this check only tells the
    /// customer early.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `quantity` is zero
    /// - [`StoreError::ProductNotFound`] if the product does not exist
    /// - [`StoreError::InsufficientStock`] if stock is short
    pub fn check_availability(&self, id: &ProductId, quantity: u32) -> Result<Product, StoreError> {
        if quantity == 0 {
            return Err(StoreError::validation("quantity must be at least 1"));
        }
        let product = self
            .find_product(id)?
            .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
        if !product.has_stock_for(quantity) {
            return Err(StoreError::InsufficientStock {
                product_id: product.id,
                requested: quantity,
                available: product.stock,
            });
        }
        Ok(product)
    }

    /// Name of the product's category, if that category still exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the categories snapshot cannot be read.
    pub fn category_name(&self, product: &Product) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get_categories()?
            .into_iter()
            .find(|c| c.id == product.category_id)
            .map(|c| c.name))
    }

    // =========================================================================
    // Product admin
    // =========================================================================

    /// Create or replace a product.
    ///
    /// New products get a fresh ID and go to the front of the list. Existing
    /// products are replaced wholesale, in place.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the name is blank or price/stock is negative
    /// - [`StoreError::ProductNotFound`] if `draft.id` names no product
    /// - [`StoreError::IdExhausted`] if no unused product ID could be drawn
    /// - storage errors from reading or writing the products snapshot
    pub fn save_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        draft.validate()?;

        let (product, created) = self.store.update(|store| {
            let mut products = store.get_products()?;

            let (product, created) = if let Some(id) = draft.id.clone() {
                let slot = products
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
                let product = draft.into_product(id);
                slot.clone_from(&product);
                (product, false)
            } else {
                let id = self
                    .ids
                    .next_unique(|candidate| products.iter().any(|p| p.id.matches(candidate)))
                    .ok_or(StoreError::IdExhausted { entity: "product" })?;
                let product = draft.into_product(ProductId::new(id));
                products.insert(0, product.clone());
                (product, true)
            };

            let batch = WriteBatch::new().products(&products)?;
            Ok(((product, created), batch))
        })?;

        tracing::info!(product_id = %product.id, created, "product saved");
        Ok(product)
    }

    /// Delete a product. Orders that reference it keep their snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if no product has this ID, or a
    /// storage error from reading or writing the products snapshot.
    pub fn delete_product(&self, id: &ProductId) -> Result<Product, StoreError> {
        let removed = self.store.update(|store| {
            let mut products = store.get_products()?;
            let index = products
                .iter()
                .position(|p| &p.id == id)
                .ok_or_else(|| StoreError::ProductNotFound(id.clone()))?;
            let removed = products.remove(index);
            let batch = WriteBatch::new().products(&products)?;
            Ok((removed, batch))
        })?;

        tracing::info!(product_id = %removed.id, "product deleted");
        Ok(removed)
    }

    // =========================================================================
    // Category admin
    // =========================================================================

    /// Every category, in stored order.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the categories snapshot cannot be read.
    pub fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.store.get_categories()
    }

    /// Create a category (`id: None`) or rename an existing one.
    ///
    /// New categories are appended.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the name is blank
    /// - [`StoreError::CategoryNotFound`] if `id` names no category
    /// - [`StoreError::IdExhausted`] if no unused category ID could be drawn
    /// - storage errors from reading or writing the categories snapshot
    pub fn save_category(&self, id: Option<CategoryId>, name: &str) -> Result<Category, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::validation("category name is required"));
        }

        let category = self.store.update(|store| {
            let mut categories = store.get_categories()?;

            let category = if let Some(id) = id {
                let slot = categories
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
                name.clone_into(&mut slot.name);
                slot.clone()
            } else {
                let id = self
                    .ids
                    .next_unique(|candidate| categories.iter().any(|c| c.id.matches(candidate)))
                    .ok_or(StoreError::IdExhausted { entity: "category" })?;
                let category = Category {
                    id: CategoryId::new(id),
                    name: name.to_owned(),
                };
                categories.push(category.clone());
                category
            };

            let batch = WriteBatch::new().categories(&categories)?;
            Ok((category, batch))
        })?;

        tracing::info!(category_id = %category.id, "category saved");
        Ok(category)
    }

    /// Delete a category. Its products keep their now-dangling `category_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CategoryNotFound`] if no category has this ID, or
    /// a storage error from reading or writing the categories snapshot.
    pub fn delete_category(&self, id: &CategoryId) -> Result<Category, StoreError> {
        let removed = self.store.update(|store| {
            let mut categories = store.get_categories()?;
            let index = categories
                .iter()
                .position(|c| &c.id == id)
                .ok_or_else(|| StoreError::CategoryNotFound(id.clone()))?;
            let removed = categories.remove(index);
            let batch = WriteBatch::new().categories(&categories)?;
            Ok((removed, batch))
        })?;

        tracing::info!(category_id = %removed.id, "category deleted");
        Ok(removed)
    }
}
