//! Forkful Backend - REST client for the managed data store.
//!
//! The catalog, orders and customer profiles live in a hosted Postgres fronted
//! by a PostgREST-style API (e.g. Supabase). This crate wraps that API:
//!
//! - [`Query`] - pure builder for `select`/filter/`order`/`limit`/`offset`
//!   query strings
//! - [`BackendClient`] - `select`, `insert`, `upsert` and `update` over
//!   `reqwest`, decoding rows with `serde`
//! - [`BackendError`] - everything that can go wrong on the wire
//! - [`repo`] - catalog, order and profile repositories speaking
//!   `forkful-core` types
//!
//! There are no retries and no caching; callers decide how to degrade.
//!
//! # Example
//!
//! ```rust,ignore
//! use forkful_backend::{BackendClient, BackendConfig, Direction, Query, Table};
//!
//! let client = BackendClient::new(&config)?;
//! let rows: Vec<serde_json::Value> = client
//!     .select(
//!         Table::Orders,
//!         &Query::new().eq("status", "pending").order("created_at", Direction::Desc),
//!     )
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod config;
mod error;
mod query;
pub mod repo;

pub use client::BackendClient;
pub use config::BackendConfig;
pub use error::BackendError;
pub use query::{Direction, Query, Table};
