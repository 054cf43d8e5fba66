//! Shopkit server library.
//!
//! This crate provides the JSON API as a library, allowing the router to be
//! driven directly in integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod services;
pub mod state;
pub mod validate;
