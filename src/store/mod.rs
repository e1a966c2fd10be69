//! Persistence layer.
//!
//! Services talk to a [`Repository`] trait object so the storage engine is
//! swappable: [`mongo::MongoRepository`] in production, [`memory::MemoryRepository`]
//! in tests. Filters and updates are plain bson documents in both cases; the
//! document-store atomics (`$push`/`$pull`/`$inc`) are surfaced as named
//! trait methods instead of leaking operator syntax into business logic.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use thiserror::Error;

use crate::models::Entity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("encode error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("decode error: {0}")]
    Decode(#[from] mongodb::bson::de::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter, sort and page window for a find call.
#[derive(Debug, Clone, Default)]
pub struct FindSpec {
    pub filter: Document,
    pub sort: Document,
    pub skip: u64,
    pub limit: i64,
}

impl FindSpec {
    pub fn filtered(filter: Document) -> Self {
        Self { filter, ..Self::default() }
    }
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Persists a new document and returns it with its assigned id.
    async fn insert(&self, doc: T) -> StoreResult<T>;
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>>;
    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>>;
    async fn find(&self, spec: FindSpec) -> StoreResult<Vec<T>>;
    async fn count(&self, filter: Document) -> StoreResult<u64>;
    /// Applies an update document and returns the post-update document.
    async fn update_by_id(&self, id: ObjectId, update: Document) -> StoreResult<Option<T>>;
    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<Option<T>>;
    /// Removes and returns the document.
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<Option<T>>;
    async fn delete_many(&self, filter: Document) -> StoreResult<u64>;
    /// Applies (filter, update) pairs in one call. No atomicity across
    /// documents is promised; engines that batch natively may do so.
    async fn batch_update(&self, ops: Vec<(Document, Document)>) -> StoreResult<()>;

    async fn append_to_set(&self, id: ObjectId, field: &str, value: Bson) -> StoreResult<Option<T>> {
        self.update_by_id(id, doc! { "$push": { field: value } }).await
    }

    async fn remove_from_set(&self, id: ObjectId, field: &str, value: Bson) -> StoreResult<Option<T>> {
        self.update_by_id(id, doc! { "$pull": { field: value } }).await
    }

    async fn increment(&self, id: ObjectId, field: &str, delta: i64) -> StoreResult<Option<T>> {
        self.update_by_id(id, doc! { "$inc": { field: delta } }).await
    }
}

pub type DynRepository<T> = Arc<dyn Repository<T>>;
