//! Named lookup entities referenced by products and blogs.
//!
//! Category, brand, color and blog category share a single shape, so one
//! generic document covers all four; the collection is picked by the marker
//! type.

use std::marker::PhantomData;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

/// Marker for a lookup collection.
pub trait LookupKind: Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Lookup<K: LookupKind> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(skip)]
    marker: PhantomData<K>,
}

impl<K: LookupKind> Lookup<K> {
    pub fn new(title: String) -> Self {
        let now = DateTime::now();
        Self { id: None, title, created_at: now, updated_at: now, marker: PhantomData }
    }
}

impl<K: LookupKind> Entity for Lookup<K> {
    const COLLECTION: &'static str = K::COLLECTION;
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

macro_rules! lookup_kind {
    ($name:ident, $alias:ident, $coll:literal) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name;
        impl LookupKind for $name {
            const COLLECTION: &'static str = $coll;
        }
        pub type $alias = Lookup<$name>;
    };
}

lookup_kind!(CategoryKind, Category, "categories");
lookup_kind!(BrandKind, Brand, "brands");
lookup_kind!(ColorKind, Color, "colors");
lookup_kind!(BlogCategoryKind, BlogCategory, "blog_categories");

#[derive(Debug, Deserialize, Validate)]
pub struct LookupPayload {
    #[validate(length(min = 1))]
    pub title: String,
}
