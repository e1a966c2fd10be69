//! Persistent documents and request payloads.

pub mod blog;
pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod enquiry;
pub mod order;
pub mod product;
pub mod user;

pub use blog::{Blog, BlogPayload};
pub use cart::{Cart, CartItemPayload, CartLine};
pub use catalog::{BlogCategory, Brand, Category, Color, Lookup, LookupPayload};
pub use coupon::{Coupon, CouponPayload};
pub use enquiry::{Enquiry, EnquiryPayload, EnquiryUpdate};
pub use order::{Order, OrderStatus, PaymentIntent};
pub use product::{Product, ProductPayload, ProductUpdate, Rating};
pub use user::{Role, User};

use mongodb::bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A document persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Option<ObjectId>;
    fn set_id(&mut self, id: ObjectId);
}
