//! Typed repositories over [`BackendClient`](crate::BackendClient).
//!
//! Each repository borrows the client and speaks in `forkful-core` types:
//! raw rows go in, normalized view models come out.

mod catalog;
mod orders;
mod profiles;

pub use catalog::{CatalogRepository, ProductFilter};
pub use orders::{OrderPage, OrderRepository};
pub use profiles::ProfileRepository;
