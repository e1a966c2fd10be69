//! One CRUD façade for the four named lookup collections (category, brand,
//! color, blog category); they differ only by collection.

use mongodb::bson::{doc, DateTime};
use validator::Validate;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::models::catalog::{Lookup, LookupKind, LookupPayload};
use crate::store::{DynRepository, FindSpec};

pub struct LookupService<K: LookupKind> {
    repo: DynRepository<Lookup<K>>,
    /// Singular display name used in not-found messages.
    label: &'static str,
}

impl<K: LookupKind> Clone for LookupService<K> {
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(), label: self.label }
    }
}

impl<K: LookupKind> LookupService<K> {
    pub fn new(repo: DynRepository<Lookup<K>>, label: &'static str) -> Self {
        Self { repo, label }
    }

    pub async fn create(&self, payload: LookupPayload) -> ApiResult<Lookup<K>> {
        payload.validate()?;
        Ok(self.repo.insert(Lookup::new(payload.title)).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Lookup<K>> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound(self.label))
    }

    pub async fn all(&self) -> ApiResult<Vec<Lookup<K>>> {
        Ok(self
            .repo
            .find(FindSpec { sort: doc! { "created_at": -1 }, ..FindSpec::default() })
            .await?)
    }

    pub async fn update(&self, id: &str, payload: LookupPayload) -> ApiResult<Lookup<K>> {
        payload.validate()?;
        let id = parse_id(id)?;
        self.repo
            .update_by_id(
                id,
                doc! { "$set": { "title": payload.title, "updated_at": DateTime::now() } },
            )
            .await?
            .ok_or(ApiError::NotFound(self.label))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Lookup<K>> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound(self.label))
    }
}
