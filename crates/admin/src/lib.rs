//! Forkful Admin library.
//!
//! Internal order management: the order list with status filter and
//! pagination, an order detail dialog, and direct status changes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
