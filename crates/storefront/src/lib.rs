//! Forkful Storefront library.
//!
//! Public ordering site: menu, product options with live pricing, a
//! session-held cart, checkout, and tracking of orders placed from the same
//! browser. Exposed as a library so the binary and tests share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
