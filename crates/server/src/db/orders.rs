//! Order repository.
//!
//! Line items and the shipping address are stored as JSON snapshots in the
//! order row; they are immutable after creation. Cancellation uses a single
//! conditional UPDATE so the pending-only rule holds without locking.

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use shopkit_core::{Address, Money, Order, OrderId, OrderItem, OrderStatus, UserId};

use super::RepositoryError;

/// Result of a cancellation attempt.
#[derive(Debug)]
pub enum CancelOutcome {
    /// The order was pending and is now cancelled.
    Cancelled(Order),
    /// The order exists but is past the pending stage; nothing changed.
    NotPending,
    /// No such order for this user.
    NotFound,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a fully-assembled order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        let items = serde_json::to_string(&order.items).map_err(|e| {
            RepositoryError::DataCorruption(format!("unencodable order items: {e}"))
        })?;
        let address = serde_json::to_string(&order.shipping_address).map_err(|e| {
            RepositoryError::DataCorruption(format!("unencodable shipping address: {e}"))
        })?;

        sqlx::query(
            r"
            INSERT INTO orders
                (id, user_id, items, total_amount, shipping_address,
                 payment_method, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(order.id.as_str())
        .bind(order.user_id.as_str())
        .bind(items)
        .bind(order.total_amount.to_string())
        .bind(address)
        .bind(&order.payment_method)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM orders WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id.as_str())
            .fetch_all(self.pool)
            .await?;

        rows.iter().map(map_order).collect()
    }

    /// Get one of a user's orders. An order belonging to someone else (or a
    /// malformed ID) is simply not found.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn get_for_user(
        &self,
        id: &OrderId,
        user_id: &UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM orders WHERE id = ? AND user_id = ?")
            .bind(id.as_str())
            .bind(user_id.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(|r| map_order(&r)).transpose()
    }

    /// Cancel a pending order.
    ///
    /// The status check and the transition happen in one conditional UPDATE,
    /// so a non-pending order can never be flipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored value is invalid.
    pub async fn cancel(
        &self,
        id: &OrderId,
        user_id: &UserId,
    ) -> Result<CancelOutcome, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET status = ?
            WHERE id = ? AND user_id = ? AND status = ?
            ",
        )
        .bind(OrderStatus::Cancelled.as_str())
        .bind(id.as_str())
        .bind(user_id.as_str())
        .bind(OrderStatus::Pending.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return match self.get_for_user(id, user_id).await? {
                Some(order) => Ok(CancelOutcome::Cancelled(order)),
                None => Ok(CancelOutcome::NotFound),
            };
        }

        match self.get_for_user(id, user_id).await? {
            Some(_) => Ok(CancelOutcome::NotPending),
            None => Ok(CancelOutcome::NotFound),
        }
    }
}

/// Map an order row into the domain type.
fn map_order(row: &SqliteRow) -> Result<Order, RepositoryError> {
    let items: String = row.try_get("items")?;
    let items: Vec<OrderItem> = serde_json::from_str(&items).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid order items in database: {e}"))
    })?;

    let address: String = row.try_get("shipping_address")?;
    let shipping_address: Address = serde_json::from_str(&address).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid shipping address in database: {e}"))
    })?;

    let total: String = row.try_get("total_amount")?;
    let total_amount = Money::parse(&total).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid total in database: {e}"))
    })?;

    let status: String = row.try_get("status")?;
    let status: OrderStatus = status.parse().map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
    })?;

    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Order {
        id: OrderId::new(row.try_get::<String, _>("id")?),
        user_id: UserId::new(row.try_get::<String, _>("user_id")?),
        items,
        total_amount,
        shipping_address,
        payment_method: row.try_get("payment_method")?,
        status,
        created_at,
    })
}
