//! Database operations for the Shopkit `SQLite` store.
//!
//! # Tables
//!
//! - `users` - Registered accounts (argon2 password hash, role, address)
//! - `products` - Catalog records
//! - `orders` - Placed orders; line items and the shipping address are
//!   stored as JSON snapshots, mirroring the document shape of the API
//!
//! Queries are runtime-checked (no compile-time database needed). Money
//! columns are TEXT and parsed into `rust_decimal` on read; IDs are UUIDv4
//! TEXT; timestamps are RFC 3339 TEXT.

pub mod orders;
pub mod products;
pub mod seed;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use orders::{CancelOutcome, OrderRepository};
pub use products::{ProductFilter, ProductRepository, SortDir, SortKey};
pub use seed::seed_products;
pub use users::UserRepository;

/// Errors arising from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness constraint violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be decoded into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// An in-memory database gets a single connection so every caller sees the
/// same data; file-backed databases get a small pool and are created on
/// first use.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let max_connections = if url.contains(":memory:") { 1 } else { 10 };

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create the schema if it does not exist yet.
///
/// # Errors
///
/// Returns `sqlx::Error` if any statement fails.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'user',
            address       TEXT,
            created_at    TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS products (
            id             TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            description    TEXT NOT NULL,
            price          TEXT NOT NULL,
            category       TEXT NOT NULL,
            image          TEXT NOT NULL,
            stock          INTEGER NOT NULL DEFAULT 0,
            rating_average REAL NOT NULL DEFAULT 0,
            rating_count   INTEGER NOT NULL DEFAULT 0,
            featured       INTEGER NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)")
        .execute(pool)
        .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS orders (
            id               TEXT PRIMARY KEY,
            user_id          TEXT NOT NULL REFERENCES users(id),
            items            TEXT NOT NULL,
            total_amount     TEXT NOT NULL,
            shipping_address TEXT NOT NULL,
            payment_method   TEXT NOT NULL,
            status           TEXT NOT NULL DEFAULT 'pending',
            created_at       TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}
