//! Customer enquiry handling.

use mongodb::bson::{doc, DateTime};
use validator::Validate;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::models::enquiry::{EnquiryPayload, EnquiryUpdate};
use crate::models::Enquiry;
use crate::store::{DynRepository, FindSpec};

#[derive(Clone)]
pub struct EnquiryService {
    repo: DynRepository<Enquiry>,
}

impl EnquiryService {
    pub fn new(repo: DynRepository<Enquiry>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: EnquiryPayload) -> ApiResult<Enquiry> {
        payload.validate()?;
        let now = DateTime::now();
        let enquiry = Enquiry {
            id: None,
            name: payload.name,
            email: payload.email,
            mobile: payload.mobile,
            comment: payload.comment,
            status: "Submitted".to_string(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.insert(enquiry).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Enquiry> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound("enquiry"))
    }

    pub async fn all(&self) -> ApiResult<Vec<Enquiry>> {
        Ok(self
            .repo
            .find(FindSpec { sort: doc! { "created_at": -1 }, ..FindSpec::default() })
            .await?)
    }

    pub async fn update(&self, id: &str, changes: EnquiryUpdate) -> ApiResult<Enquiry> {
        let id = parse_id(id)?;
        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(v) = changes.status {
            set.insert("status", v);
        }
        if let Some(v) = changes.comment {
            set.insert("comment", v);
        }
        self.repo
            .update_by_id(id, doc! { "$set": set })
            .await?
            .ok_or(ApiError::NotFound("enquiry"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Enquiry> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound("enquiry"))
    }
}
