//! Order record and its line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::Address;
use crate::types::{Money, OrderId, OrderStatus, ProductId, UserId};

/// One product-quantity pair inside an order.
///
/// The price is a snapshot taken when the order was created; later catalog
/// price changes never affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Money,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub shipping_address: Address,
    pub payment_method: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether the order is still cancellable.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}
