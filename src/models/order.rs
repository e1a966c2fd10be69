//! Order document, a checkout-time snapshot of the cart.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Not Processed")]
    NotProcessed,
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    Processing,
    Dispatched,
    Cancelled,
    Delivered,
}

/// Descriptor of a payment attempt. Only cash on delivery exists today; the
/// shape matches what a gateway integration would fill in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub method: String,
    pub amount: f64,
    pub status: OrderStatus,
    pub currency: String,
    pub created: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub products: Vec<CartLine>,
    pub payment_intent: PaymentIntent,
    pub order_by: ObjectId,
    pub order_status: OrderStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Entity for Order {
    const COLLECTION: &'static str = "orders";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusPayload {
    pub status: OrderStatus,
}
