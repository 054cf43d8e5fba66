//! Service layer: auth, catalog queries, and order assembly.

pub mod auth;
pub mod catalog;
pub mod orders;
