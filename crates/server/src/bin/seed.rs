//! Seed the database with sample catalog data.
//!
//! Destructive: clears the products table before inserting.

#![cfg_attr(not(test), forbid(unsafe_code))]

use shopkit_server::{config::ServerConfig, db};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopkit_server=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Failed to load configuration");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::migrate(&pool).await.expect("Failed to run migrations");

    let count = db::seed_products(&pool).await.expect("Failed to seed products");
    tracing::info!("Seeded {count} products");
}
