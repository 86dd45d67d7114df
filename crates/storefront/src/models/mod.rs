//! Session-held models for the storefront.

pub mod session;
