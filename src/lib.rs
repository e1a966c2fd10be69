//! oxcart: an e-commerce REST backend over MongoDB.
//!
//! Accounts and sessions, a product catalog with ratings and wishlists,
//! blogs, coupons, carts and cash-on-delivery checkout, exposed as JSON
//! over HTTP. Persistence goes through the [`store::Repository`] trait so
//! the engine is swappable; [`store::memory::MemoryRepository`] backs the
//! test suites.

pub mod auth;
pub mod config;
pub mod error;
pub mod media;
pub mod models;
pub mod notify;
pub mod query;
pub mod routes;
pub mod services;
pub mod slug;
pub mod state;
pub mod store;

pub use error::{ApiError, ApiResult};
