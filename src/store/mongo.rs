//! MongoDB-backed repository.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, from_document, oid::ObjectId, to_document, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};

use super::{FindSpec, Repository, StoreError, StoreResult};
use crate::models::Entity;

pub struct MongoRepository<T: Entity> {
    coll: Collection<Document>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Entity> MongoRepository<T> {
    pub fn new(db: &Database) -> Self {
        Self { coll: db.collection(T::COLLECTION), marker: PhantomData }
    }

    fn decode(doc: Document) -> StoreResult<T> {
        from_document(doc).map_err(StoreError::from)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MongoRepository<T> {
    async fn insert(&self, mut doc: T) -> StoreResult<T> {
        let encoded = to_document(&doc)?;
        let result = self.coll.insert_one(encoded).await?;
        if let Some(id) = result.inserted_id.as_object_id() {
            doc.set_id(id);
        }
        Ok(doc)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        self.find_one(doc! { "_id": id }).await
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        self.coll.find_one(filter).await?.map(Self::decode).transpose()
    }

    async fn find(&self, spec: FindSpec) -> StoreResult<Vec<T>> {
        let mut find = self.coll.find(spec.filter);
        if !spec.sort.is_empty() {
            find = find.sort(spec.sort);
        }
        if spec.skip > 0 {
            find = find.skip(spec.skip);
        }
        if spec.limit > 0 {
            find = find.limit(spec.limit);
        }
        let docs: Vec<Document> = find.await?.try_collect().await?;
        docs.into_iter().map(Self::decode).collect()
    }

    async fn count(&self, filter: Document) -> StoreResult<u64> {
        Ok(self.coll.count_documents(filter).await?)
    }

    async fn update_by_id(&self, id: ObjectId, update: Document) -> StoreResult<Option<T>> {
        self.update_one(doc! { "_id": id }, update).await
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<Option<T>> {
        self.coll
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?
            .map(Self::decode)
            .transpose()
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        self.coll
            .find_one_and_delete(doc! { "_id": id })
            .await?
            .map(Self::decode)
            .transpose()
    }

    async fn delete_many(&self, filter: Document) -> StoreResult<u64> {
        Ok(self.coll.delete_many(filter).await?.deleted_count)
    }

    async fn batch_update(&self, ops: Vec<(Document, Document)>) -> StoreResult<()> {
        for (filter, update) in ops {
            self.coll.update_one(filter, update).await?;
        }
        Ok(())
    }
}
