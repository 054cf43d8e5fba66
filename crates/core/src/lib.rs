//! Shopkit Core - Shared types library.
//!
//! This crate provides common types used across all Shopkit components:
//! - `server` - JSON API backing authentication, catalog, and orders
//! - `client` - Storefront client state (cart, session, API access)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, and statuses
//! - [`models`] - Domain records shared on the wire (products, orders, users)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
