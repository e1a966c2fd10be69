//! Shopping cart document. One active cart per user; setting the cart
//! replaces the previous one wholesale.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product: ObjectId,
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Unit price snapshot taken from the catalog when the cart was set.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub products: Vec<CartLine>,
    pub cart_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_after_discount: Option<f64>,
    pub order_by: ObjectId,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Entity for Cart {
    const COLLECTION: &'static str = "carts";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

/// One requested line in a set-cart call. The price is deliberately absent:
/// unit prices are resolved from the catalog, never taken from the client.
#[derive(Debug, Deserialize)]
pub struct CartItemPayload {
    pub prod_id: String,
    pub count: i64,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetCartPayload {
    pub cart: Vec<CartItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyCouponPayload {
    pub coupon: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
    #[serde(rename = "COD", default)]
    pub cod: bool,
    #[serde(default)]
    pub coupon_applied: bool,
}
