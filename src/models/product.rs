//! Product catalog document.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub star: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub posted_by: ObjectId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    #[serde(default)]
    pub color: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    /// Rounded mean of all rating stars.
    #[serde(default)]
    pub total_ratings: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Entity for Product {
    const COLLECTION: &'static str = "products";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Partial update; absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ProductUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<i64>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RatingPayload {
    pub prod_id: String,
    #[validate(range(min = 1, max = 5))]
    pub star: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WishlistPayload {
    pub prod_id: String,
}
