//! Blog post document.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub num_views: i64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_disliked: bool,
    /// Invariant: a user id lives in at most one of `likes`/`dislikes`.
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub dislikes: Vec<ObjectId>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_author")]
    pub author: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn default_author() -> String {
    "Admin".to_string()
}

impl Entity for Blog {
    const COLLECTION: &'static str = "blogs";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BlogPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub author: Option<String>,
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct BlogReaction {
    pub blog_id: String,
}
