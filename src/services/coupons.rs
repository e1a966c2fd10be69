//! Coupon administration.

use mongodb::bson::{doc, DateTime};
use validator::Validate;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::models::coupon::CouponPayload;
use crate::models::Coupon;
use crate::store::{DynRepository, FindSpec};

#[derive(Clone)]
pub struct CouponService {
    repo: DynRepository<Coupon>,
}

impl CouponService {
    pub fn new(repo: DynRepository<Coupon>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: CouponPayload) -> ApiResult<Coupon> {
        payload.validate()?;
        let now = DateTime::now();
        let coupon = Coupon {
            id: None,
            name: payload.name.to_uppercase(),
            expiry: DateTime::from_millis(payload.expiry.timestamp_millis()),
            discount: payload.discount,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.insert(coupon).await?)
    }

    pub async fn all(&self) -> ApiResult<Vec<Coupon>> {
        Ok(self
            .repo
            .find(FindSpec { sort: doc! { "created_at": -1 }, ..FindSpec::default() })
            .await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Coupon> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound("coupon"))
    }

    pub async fn update(&self, id: &str, payload: CouponPayload) -> ApiResult<Coupon> {
        payload.validate()?;
        let id = parse_id(id)?;
        self.repo
            .update_by_id(
                id,
                doc! { "$set": {
                    "name": payload.name.to_uppercase(),
                    "expiry": DateTime::from_millis(payload.expiry.timestamp_millis()),
                    "discount": payload.discount,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?
            .ok_or(ApiError::NotFound("coupon"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Coupon> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound("coupon"))
    }
}
