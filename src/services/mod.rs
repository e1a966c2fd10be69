//! Application services: one façade per resource plus the shopping workflow.

pub mod blogs;
pub mod coupons;
pub mod enquiries;
pub mod lookup;
pub mod products;
pub mod shopping;
pub mod users;

pub use blogs::BlogService;
pub use coupons::CouponService;
pub use enquiries::EnquiryService;
pub use lookup::LookupService;
pub use products::ProductService;
pub use shopping::ShoppingService;
pub use users::UserService;

use anyhow::Context;
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Ids arrive as path/body strings; malformed ones are rejected before any
/// lookup happens.
pub fn parse_id(raw: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|_| ApiError::validation(format!("this id is not valid or not found: {raw}")))
}

pub fn to_json<T: Serialize>(value: &T) -> ApiResult<Value> {
    Ok(serde_json::to_value(value).context("response serialization failed")?)
}
