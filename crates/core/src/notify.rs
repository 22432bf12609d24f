//! WhatsApp checkout handoff.
//!
//! After placing an order the customer sends the store a pre-filled message
//! with the order details and a tracking link. Everything here is pure string
//! building; nothing is sent.

use crate::types::{Order, OrderId};

/// Currency label used when none is configured.
pub const DEFAULT_CURRENCY: &str = "Bs";

const WHATSAPP_BASE: &str = "https://wa.me";

/// Builds tracking links, order messages and `wa.me` deep links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLinkBuilder {
    tracking_base_url: String,
    currency: String,
}

impl ContactLinkBuilder {
    /// Create a builder for a storefront served at `tracking_base_url`.
    ///
    /// A trailing `/` on the base is ignored.
    #[must_use]
    pub fn new(tracking_base_url: &str, currency: &str) -> Self {
        Self {
            tracking_base_url: tracking_base_url.trim_end_matches('/').to_owned(),
            currency: currency.to_owned(),
        }
    }

    /// `<base>/tracking/<order id>`.
    #[must_use]
    pub fn tracking_url(&self, order_id: &OrderId) -> String {
        format!("{}/tracking/{order_id}", self.tracking_base_url)
    }

    /// The message the customer sends to the store.
    #[must_use]
    pub fn message(&self, order: &Order) -> String {
        format!(
            "Hola, mi pedido es el #{id}\n\
             Producto: {product}\n\
             Cantidad: {quantity}\n\
             Total: {currency} {total}\n\
             Link de seguimiento: {tracking}\n\
             Enseguida mando mi ubicación.",
            id = order.id,
            product = order.product_name,
            quantity = order.quantity,
            currency = self.currency,
            total = order.total,
            tracking = self.tracking_url(&order.id),
        )
    }

    /// `https://wa.me/<number>?text=<percent-encoded message>`.
    ///
    /// Anything but digits is dropped from `whatsapp_number`, so `+591 700-00000`
    /// and `59170000000` produce the same link.
    #[must_use]
    pub fn contact_link(&self, order: &Order, whatsapp_number: &str) -> String {
        let number: String = whatsapp_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let message = self.message(order);
        let text = urlencoding::encode(&message);
        format!("{WHATSAPP_BASE}/{number}?text={text}")
    }
}

/// Order message using the default currency label.
#[must_use]
pub fn build_tracking_message(order: &Order, tracking_base_url: &str) -> String {
    ContactLinkBuilder::new(tracking_base_url, DEFAULT_CURRENCY).message(order)
}

/// `wa.me` deep link using the default currency label.
#[must_use]
pub fn build_contact_link(order: &Order, whatsapp_number: &str, tracking_base_url: &str) -> String {
    ContactLinkBuilder::new(tracking_base_url, DEFAULT_CURRENCY).contact_link(order, whatsapp_number)
}
