//! Order assembly service.
//!
//! The server computes the authoritative total from the submitted line
//! items: 10% tax on the subtotal plus a flat shipping fee, rounded half-up
//! to cents at the end. Note that line-item prices are taken from the
//! request body as submitted, not re-read from the catalog, so a client can
//! place an order at a price of its choosing. Fixing that requires a
//! catalog lookup per item at assembly time.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use shopkit_core::{Money, Order, OrderId, OrderItem, OrderStatus, UserId};

use crate::db::{CancelOutcome, OrderRepository, RepositoryError};
use crate::validate::OrderFields;

/// Tax rate applied to the subtotal (10%).
const TAX_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Flat shipping fee in dollars (5.99).
const SHIPPING_FEE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Order creation and lifecycle.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Assemble and persist an order for a user.
    ///
    /// The total is always recomputed here; any total supplied by the
    /// client is ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the insert fails.
    pub async fn create(
        &self,
        user_id: &UserId,
        fields: OrderFields,
    ) -> Result<Order, RepositoryError> {
        let order = Order {
            id: OrderId::random(),
            user_id: user_id.clone(),
            total_amount: compute_total(&fields.items),
            items: fields.items,
            shipping_address: fields.shipping_address,
            payment_method: fields.payment_method,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        self.orders.insert(&order).await?;
        Ok(order)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        self.orders.list_for_user(user_id).await
    }

    /// Get one of a user's orders. Someone else's order is not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn get(
        &self,
        id: &OrderId,
        user_id: &UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        self.orders.get_for_user(id, user_id).await
    }

    /// Cancel one of a user's orders, if it is still pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a query fails.
    pub async fn cancel(
        &self,
        id: &OrderId,
        user_id: &UserId,
    ) -> Result<CancelOutcome, RepositoryError> {
        self.orders.cancel(id, user_id).await
    }
}

/// Compute the order total: `round2(subtotal * 1.1 + 5.99)`.
///
/// The subtotal stays unrounded through the tax multiplication; only the
/// final amount is rounded to cents.
fn compute_total(items: &[OrderItem]) -> Money {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price.as_decimal() * Decimal::from(item.quantity))
        .sum();

    Money::from_decimal(subtotal + subtotal * TAX_RATE + SHIPPING_FEE)
}
