//! Storefront records: categories, products, orders and the settings singleton.
//!
//! Field names serialize in camelCase, matching the snapshots the storefront
//! keeps in its key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, OrderId, OrderStatus, Price, ProductId};

/// A flat product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A catalog product.
///
/// `category_id` is a soft reference: nothing stops a category from being
/// deleted out from under its products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Units on hand. Signed because an oversold product goes below zero.
    pub stock: i64,
    pub category_id: CategoryId,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    /// Whether `quantity` units can be sold from current stock.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        i64::from(quantity) <= self.stock
    }
}

/// A customer order.
///
/// `product_name` and `total` are snapshots taken when the order was placed:
/// later edits to the product, or its deletion, leave the order untouched.
/// Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    #[serde(rename = "customerWhatsApp")]
    pub customer_whatsapp: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub total: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Store-wide settings. Exactly one instance exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub store_name: String,
    /// Compared in plaintext by the admin login.
    pub admin_password: String,
    /// Number that receives order messages, international format without `+`.
    pub whatsapp_number: String,
    /// Currency label shown next to amounts.
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_name: "Tienda Premium Bolivia".to_owned(),
            admin_password: "admin123".to_owned(),
            whatsapp_number: "59170000000".to_owned(),
            currency: "Bs".to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_order() -> Order {
        Order {
            id: OrderId::new("K3J9X0P2Q"),
            customer_name: "Juan".to_owned(),
            customer_whatsapp: "59170000000".to_owned(),
            product_id: ProductId::new("prod1"),
            product_name: "Smartphone Galaxy S23".to_owned(),
            quantity: 2,
            total: Price::from_units(9000),
            status: OrderStatus::EnEspera,
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap(),
        }
    }

    #[test]
    fn test_order_uses_storefront_field_names() {
        let json = serde_json::to_value(sample_order()).unwrap();
        let object = json.as_object().unwrap();
        for key in [
            "id",
            "customerName",
            "customerWhatsApp",
            "productId",
            "productName",
            "quantity",
            "total",
            "status",
            "createdAt",
        ] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(json["status"], "en_espera");
    }

    #[test]
    fn test_order_reads_storefront_snapshot() {
        let raw = r#"{
            "id": "ABC123XYZ",
            "customerName": "Ana",
            "customerWhatsApp": "59171111111",
            "productId": "prod2",
            "productName": "Cafetera Expresso Pro",
            "quantity": 1,
            "total": 1200,
            "status": "aceptado",
            "createdAt": "2025-01-05T10:00:00.000Z"
        }"#;
        let order: Order = serde_json::from_str(raw).unwrap();
        assert_eq!(order.total, Price::from_units(1200));
        assert_eq!(order.status, OrderStatus::Aceptado);
        assert_eq!(order.customer_whatsapp, "59171111111");
    }

    #[test]
    fn test_product_optional_fields_default() {
        let raw = r#"{"id":"p","name":"Mate","price":10,"stock":3,"categoryId":"cat2"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert!(product.description.is_empty());
        assert!(product.image_url.is_empty());
    }

    #[test]
    fn test_has_stock_for() {
        let product = Product {
            id: ProductId::new("prod2"),
            name: "Cafetera Expresso Pro".to_owned(),
            description: String::new(),
            price: Price::from_units(1200),
            stock: 5,
            category_id: CategoryId::new("cat2"),
            image_url: String::new(),
        };
        assert!(product.has_stock_for(5));
        assert!(!product.has_stock_for(6));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.whatsapp_number, "59170000000");
        assert_eq!(settings.currency, "Bs");
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["storeName"], "Tienda Premium Bolivia");
        assert_eq!(json["adminPassword"], "admin123");
    }
}
