//! Order lifecycle: checkout, status changes and lookup.
//!
//! Checkout is the one operation that touches two collections. The product's
//! stock decrement and the new order are committed in a single
//! [`WriteBatch`], so either both land or neither does.

use std::fmt;
use std::str::FromStr;

use tienda_core::{Clock, IdGenerator, Order, OrderId, OrderStatus, ProductId};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::store::{Store, WriteBatch};

/// What checkout does when an order asks for more units than are in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockPolicy {
    /// Refuse the order with [`StoreError::InsufficientStock`].
    #[default]
    Reject,
    /// Accept the order and let stock go negative.
    AllowOversell,
}

impl StockPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::AllowOversell => "allow-oversell",
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "allow-oversell" | "allow_oversell" => Ok(Self::AllowOversell),
            _ => Err(format!("invalid stock policy: {s} (expected reject or allow-oversell)")),
        }
    }
}

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub quantity: u32,
    pub customer_name: String,
    pub customer_whatsapp: String,
}

/// Order operations over a [`Store`].
pub struct OrderService<'a, B> {
    store: &'a Store<B>,
    clock: &'a dyn Clock,
    ids: &'a IdGenerator,
    policy: StockPolicy,
}

impl<'a, B: Backend> OrderService<'a, B> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(
        store: &'a Store<B>,
        clock: &'a dyn Clock,
        ids: &'a IdGenerator,
        policy: StockPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            ids,
            policy,
        }
    }

    /// Place an order: snapshot the product's name and price, take the units
    /// out of stock and record the order as the newest one.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if `quantity` is zero or a customer field is blank
    /// - [`StoreError::ProductNotFound`] if the product does not exist
    /// - [`StoreError::InsufficientStock`] if stock is short and the policy rejects
    /// - [`StoreError::IdExhausted`] if no unused order ID could be drawn
    /// - storage errors from reading or writing snapshots
    ///
    /// Nothing is written when an error is returned.
    pub fn create_order(&self, request: NewOrder) -> Result<Order, StoreError> {
        if request.quantity == 0 {
            return Err(StoreError::validation("quantity must be at least 1"));
        }
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(StoreError::validation("customer name is required"));
        }
        let customer_whatsapp = request.customer_whatsapp.trim();
        if customer_whatsapp.is_empty() {
            return Err(StoreError::validation("customer WhatsApp number is required"));
        }

        let order = self.store.update(|store| {
            let mut products = store.get_products()?;
            let product = products
                .iter_mut()
                .find(|p| p.id == request.product_id)
                .ok_or_else(|| StoreError::ProductNotFound(request.product_id.clone()))?;

            if !product.has_stock_for(request.quantity) {
                match self.policy {
                    StockPolicy::Reject => {
                        return Err(StoreError::InsufficientStock {
                            product_id: product.id.clone(),
                            requested: request.quantity,
                            available: product.stock,
                        });
                    }
                    StockPolicy::AllowOversell => {
                        tracing::warn!(
                            product_id = %product.id,
                            requested = request.quantity,
                            available = product.stock,
                            "overselling product"
                        );
                    }
                }
            }

            let mut orders = store.get_orders()?;
            let id = self
                .ids
                .next_unique(|candidate| orders.iter().any(|o| o.id.matches(candidate)))
                .ok_or(StoreError::IdExhausted { entity: "order" })?;

            let order = Order {
                id: OrderId::new(id),
                customer_name: customer_name.to_owned(),
                customer_whatsapp: customer_whatsapp.to_owned(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: request.quantity,
                total: product.price.times(request.quantity),
                status: OrderStatus::EnEspera,
                created_at: self.clock.now(),
            };
            product.stock -= i64::from(request.quantity);
            orders.insert(0, order.clone());

            let batch = WriteBatch::new().products(&products)?.orders(&orders)?;
            Ok((order, batch))
        })?;

        tracing::info!(
            order_id = %order.id,
            product_id = %order.product_id,
            quantity = order.quantity,
            total = %order.total,
            "order created"
        );
        Ok(order)
    }

    /// Set an order's status. Any status may follow any other.
    ///
    /// The first order whose ID matches `order_id` (ignoring case) is
    /// updated; every other field is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] if no order matches, or a storage
    /// error from reading or writing the orders snapshot.
    pub fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let (order, previous) = self.store.update(|store| {
            let mut orders = store.get_orders()?;
            let order = orders
                .iter_mut()
                .find(|o| o.id.matches(order_id))
                .ok_or_else(|| StoreError::OrderNotFound(order_id.to_owned()))?;

            let previous = order.status;
            order.status = status;
            let updated = order.clone();

            let batch = WriteBatch::new().orders(&orders)?;
            Ok(((updated, previous), batch))
        })?;

        tracing::info!(
            order_id = %order.id,
            from = %previous,
            to = %status,
            "order status updated"
        );
        Ok(order)
    }

    /// Look an order up by ID, ignoring case. Returns the first match.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the orders snapshot cannot be read; an
    /// unknown ID is `Ok(None)`.
    pub fn find_order(&self, order_id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self
            .store
            .get_orders()?
            .into_iter()
            .find(|o| o.id.matches(order_id)))
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the orders snapshot cannot be read.
    pub fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.store.get_orders()
    }

    /// Orders placed for one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the orders snapshot cannot be read.
    pub fn orders_for_product(&self, product_id: &ProductId) -> Result<Vec<Order>, StoreError> {
        let mut orders = self.store.get_orders()?;
        orders.retain(|o| &o.product_id == product_id);
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tienda_core::{FixedClock, Price, Product};

    use super::*;
    use crate::backend::MemoryBackend;
    use crate::seed::SeedData;
    use crate::store::StoreKey;

    struct Fixture {
        store: Store<MemoryBackend>,
        clock: FixedClock,
        ids: IdGenerator,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: Store::new(MemoryBackend::new(), SeedData::builtin()),
                clock: FixedClock(Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()),
                ids: IdGenerator::seeded(11),
            }
        }

        fn service(&self, policy: StockPolicy) -> OrderService<'_, MemoryBackend> {
            OrderService::new(&self.store, &self.clock, &self.ids, policy)
        }

        fn product(&self, id: &str) -> Product {
            self.store
                .get_products()
                .unwrap()
                .into_iter()
                .find(|p| p.id.as_str() == id)
                .unwrap()
        }
    }

    fn request(product: &str, quantity: u32) -> NewOrder {
        NewOrder {
            product_id: ProductId::new(product),
            quantity,
            customer_name: "Juan".to_owned(),
            customer_whatsapp: "59170000000".to_owned(),
        }
    }

    // =========================================================================
    // create_order
    // =========================================================================

    #[test]
    fn test_create_order_snapshots_price_and_decrements_stock() {
        let fx = Fixture::new();
        let order = fx
            .service(StockPolicy::Reject)
            .create_order(request("prod1", 2))
            .unwrap();

        assert_eq!(order.total, Price::from_units(9000));
        assert_eq!(order.status, OrderStatus::EnEspera);
        assert_eq!(order.product_name, "Smartphone Galaxy S23");
        assert_eq!(order.created_at, fx.clock.0);
        assert_eq!(order.id.as_str().len(), 9);
        assert_eq!(fx.product("prod1").stock, 8);
    }

    #[test]
    fn test_create_order_is_discoverable() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod3", 1)).unwrap();
        assert_eq!(service.find_order(order.id.as_str()).unwrap(), Some(order));
    }

    #[test]
    fn test_create_order_prepends() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let first = service.create_order(request("prod1", 1)).unwrap();
        let second = service.create_order(request("prod2", 1)).unwrap();

        let orders = service.list_orders().unwrap();
        assert_eq!(
            orders.iter().map(|o| o.id.clone()).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
    }

    #[test]
    fn test_create_order_unknown_product_changes_nothing() {
        let fx = Fixture::new();
        let err = fx
            .service(StockPolicy::Reject)
            .create_order(request("prod404", 1))
            .unwrap_err();

        assert!(matches!(err, StoreError::ProductNotFound(ref id) if id.as_str() == "prod404"));
        for key in StoreKey::ALL {
            assert!(!fx.store.is_persisted(key).unwrap());
        }
    }

    #[test]
    fn test_create_order_rejects_zero_quantity() {
        let fx = Fixture::new();
        let err = fx
            .service(StockPolicy::Reject)
            .create_order(request("prod1", 0))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(fx.product("prod1").stock, 10);
    }

    #[test]
    fn test_create_order_requires_customer_details() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);

        let mut blank_name = request("prod1", 1);
        blank_name.customer_name = "   ".to_owned();
        assert!(matches!(
            service.create_order(blank_name).unwrap_err(),
            StoreError::Validation(_)
        ));

        let mut blank_phone = request("prod1", 1);
        blank_phone.customer_whatsapp = String::new();
        assert!(matches!(
            service.create_order(blank_phone).unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[test]
    fn test_create_order_reject_policy() {
        let fx = Fixture::new();
        let err = fx
            .service(StockPolicy::Reject)
            .create_order(request("prod2", 6))
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::InsufficientStock {
                requested: 6,
                available: 5,
                ..
            }
        ));
        assert_eq!(fx.product("prod2").stock, 5);
        assert!(fx.store.get_orders().unwrap().is_empty());
    }

    #[test]
    fn test_create_order_allow_oversell_policy() {
        let fx = Fixture::new();
        let order = fx
            .service(StockPolicy::AllowOversell)
            .create_order(request("prod2", 7))
            .unwrap();

        assert_eq!(order.total, Price::from_units(8400));
        assert_eq!(fx.product("prod2").stock, -2);
    }

    #[test]
    fn test_create_order_exact_stock_allowed() {
        let fx = Fixture::new();
        fx.service(StockPolicy::Reject)
            .create_order(request("prod2", 5))
            .unwrap();
        assert_eq!(fx.product("prod2").stock, 0);
    }

    #[test]
    fn test_order_total_survives_price_change_and_deletion() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 2)).unwrap();

        let mut products = fx.store.get_products().unwrap();
        if let Some(p) = products.iter_mut().find(|p| p.id.as_str() == "prod1") {
            p.price = Price::from_units(1);
            p.name = "Renamed".to_owned();
        }
        fx.store.save_products(&products).unwrap();
        let found = service.find_order(order.id.as_str()).unwrap().unwrap();
        assert_eq!(found.total, Price::from_units(9000));
        assert_eq!(found.product_name, "Smartphone Galaxy S23");

        products.retain(|p| p.id.as_str() != "prod1");
        fx.store.save_products(&products).unwrap();
        assert_eq!(service.find_order(order.id.as_str()).unwrap(), Some(found));
    }

    // =========================================================================
    // update_order_status
    // =========================================================================

    #[test]
    fn test_update_order_status_changes_only_status() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 2)).unwrap();

        let updated = service
            .update_order_status(order.id.as_str(), OrderStatus::Entregado)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Entregado);

        let found = service.find_order(order.id.as_str()).unwrap().unwrap();
        assert_eq!(
            found,
            Order {
                status: OrderStatus::Entregado,
                ..order
            }
        );
    }

    #[test]
    fn test_update_order_status_is_idempotent() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 1)).unwrap();

        let once = service
            .update_order_status(order.id.as_str(), OrderStatus::EnCamino)
            .unwrap();
        let twice = service
            .update_order_status(order.id.as_str(), OrderStatus::EnCamino)
            .unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_order_status_allows_any_transition() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 1)).unwrap();
        let id = order.id.as_str();

        service.update_order_status(id, OrderStatus::Entregado).unwrap();
        let back = service.update_order_status(id, OrderStatus::EnEspera).unwrap();
        assert_eq!(back.status, OrderStatus::EnEspera);

        service.update_order_status(id, OrderStatus::Cancelado).unwrap();
        let revived = service.update_order_status(id, OrderStatus::Aceptado).unwrap();
        assert_eq!(revived.status, OrderStatus::Aceptado);
    }

    #[test]
    fn test_update_order_status_unknown_order() {
        let fx = Fixture::new();
        let err = fx
            .service(StockPolicy::Reject)
            .update_order_status("NOPE", OrderStatus::Aceptado)
            .unwrap_err();
        assert!(matches!(err, StoreError::OrderNotFound(ref id) if id == "NOPE"));
    }

    #[test]
    fn test_update_order_status_does_not_touch_stock() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 3)).unwrap();
        service
            .update_order_status(order.id.as_str(), OrderStatus::Cancelado)
            .unwrap();
        assert_eq!(fx.product("prod1").stock, 7);
    }

    // =========================================================================
    // find_order
    // =========================================================================

    #[test]
    fn test_find_order_ignores_case() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 1)).unwrap();
        let lower = order.id.as_str().to_lowercase();
        assert_eq!(service.find_order(&lower).unwrap(), Some(order));
    }

    #[test]
    fn test_find_order_unknown_is_none() {
        let fx = Fixture::new();
        assert!(
            fx.service(StockPolicy::Reject)
                .find_order("ZZZZZZZZZ")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_find_order_returns_first_of_duplicates() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        let order = service.create_order(request("prod1", 1)).unwrap();

        let mut shadow = order.clone();
        shadow.customer_name = "Shadow".to_owned();
        let mut orders = fx.store.get_orders().unwrap();
        orders.push(shadow);
        fx.store.save_orders(&orders).unwrap();

        let found = service.find_order(order.id.as_str()).unwrap().unwrap();
        assert_eq!(found.customer_name, "Juan");

        service
            .update_order_status(order.id.as_str(), OrderStatus::Aceptado)
            .unwrap();
        let orders = fx.store.get_orders().unwrap();
        assert_eq!(orders.first().unwrap().status, OrderStatus::Aceptado);
        assert_eq!(orders.get(1).unwrap().status, OrderStatus::EnEspera);
    }

    #[test]
    fn test_orders_for_product() {
        let fx = Fixture::new();
        let service = fx.service(StockPolicy::Reject);
        service.create_order(request("prod1", 1)).unwrap();
        service.create_order(request("prod2", 1)).unwrap();
        service.create_order(request("prod1", 1)).unwrap();

        let orders = service
            .orders_for_product(&ProductId::new("prod1"))
            .unwrap();
        assert_eq!(orders.len(), 2);
    }

    // =========================================================================
    // StockPolicy
    // =========================================================================

    #[test]
    fn test_stock_policy_parse() {
        assert_eq!("reject".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert_eq!(
            "Allow-Oversell".parse::<StockPolicy>().unwrap(),
            StockPolicy::AllowOversell
        );
        assert!("maybe".parse::<StockPolicy>().is_err());
        assert_eq!(StockPolicy::default(), StockPolicy::Reject);
    }
}
