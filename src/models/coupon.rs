//! Discount coupon document.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Coupon code, stored uppercase.
    pub name: String,
    pub expiry: DateTime,
    /// Percentage off the cart total.
    pub discount: f64,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Entity for Coupon {
    const COLLECTION: &'static str = "coupons";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CouponPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub expiry: chrono::DateTime<chrono::Utc>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub discount: f64,
}
