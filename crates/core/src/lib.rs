//! Forkful Core - Shared domain library.
//!
//! This crate provides the domain types and logic used across all Forkful components:
//! - `storefront` - Public-facing ordering site
//! - `admin` - Internal order management panel
//! - `cli` - Command-line tools for migrations, seeding and operations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Backend rows come in as loosely-typed JSON and leave
//! as the typed view models defined here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phones and statuses
//! - [`catalog`] - Products, categories, options and variations
//! - [`order`] - Orders, line items, addresses and customer profiles
//! - [`normalize`] - Coercion of raw backend rows into typed orders
//! - [`pricing`] - Option/variation price aggregation and selection rules
//! - [`cart`] - Cart contents held for a visitor until checkout

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod normalize;
pub mod order;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{Category, Product, ProductOption, Variation};
pub use order::{Address, LineItem, Order, OrderRow, Profile};
pub use pricing::{PriceQuote, Selection, SelectionError};
pub use types::*;
