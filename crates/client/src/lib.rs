//! Client-side state for the Shopkit storefront.
//!
//! Three pieces, kept deliberately separate:
//!
//! - [`cart`] - the local cart store: a reducer over line items that
//!   snapshots itself to a [`storage::SnapshotStore`] after every mutation
//! - [`session`] - authentication state with a fail-closed startup check
//! - [`api`] - a thin typed HTTP client for the JSON API
//!
//! The cart and session never talk to storage or the network directly;
//! both go through trait seams so a frontend can plug in whatever
//! persistence and transport it has.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError, AuthApi, AuthSuccess};
pub use cart::{CartLine, CartStore};
pub use session::Session;
pub use storage::{FileStore, MemoryStore, SnapshotStore, StorageError};
