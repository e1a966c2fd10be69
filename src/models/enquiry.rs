//! Customer enquiry document.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enquiry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub comment: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_status() -> String {
    "Submitted".to_string()
}

impl Entity for Enquiry {
    const COLLECTION: &'static str = "enquiries";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnquiryPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub mobile: String,
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EnquiryUpdate {
    pub status: Option<String>,
    pub comment: Option<String>,
}
