//! Domain records shared between the server and the client.
//!
//! These are the wire shapes of the JSON API: field names are camelCase and
//! timestamps are RFC 3339. The server's storage layer maps rows into these
//! types; the client deserializes responses straight into them.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem};
pub use product::{Pagination, Product, ProductPage, Ratings};
pub use user::{Address, User};
