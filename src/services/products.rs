//! Product catalog service: CRUD with slug derivation, filtered listing,
//! wishlist toggling and rating aggregation.

use std::collections::HashMap;

use mongodb::bson::{doc, to_bson, DateTime, Document};
use serde_json::Value;
use validator::Validate;

use super::{parse_id, to_json};
use crate::error::{ApiError, ApiResult};
use crate::models::product::{ProductPayload, ProductUpdate, Rating, RatingPayload};
use crate::models::{Product, User};
use crate::query::{project_fields, ListQuery};
use crate::slug::slugify;
use crate::store::DynRepository;

#[derive(Clone)]
pub struct ProductService {
    repo: DynRepository<Product>,
    users: DynRepository<User>,
}

impl ProductService {
    pub fn new(repo: DynRepository<Product>, users: DynRepository<User>) -> Self {
        Self { repo, users }
    }

    pub async fn create(&self, payload: ProductPayload) -> ApiResult<Product> {
        payload.validate()?;
        let now = DateTime::now();
        let product = Product {
            id: None,
            slug: slugify(&payload.title),
            title: payload.title,
            description: payload.description,
            price: payload.price,
            category: payload.category,
            brand: payload.brand,
            color: payload.color,
            quantity: payload.quantity,
            sold: 0,
            images: payload.images,
            ratings: Vec::new(),
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.insert(product).await?)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound("product"))
    }

    /// Filtered, sorted, projected and paginated listing. Asking for a page
    /// past the end of the result set is an error rather than an empty page.
    pub async fn list(&self, params: &HashMap<String, String>) -> ApiResult<Vec<Value>> {
        let query = ListQuery::parse(params);
        if query.page.is_some() {
            let total = self.repo.count(query.filter.clone()).await?;
            if query.skip() >= total {
                return Err(ApiError::OutOfRange);
            }
        }
        let products = self.repo.find(query.find_spec()).await?;
        let mut out = Vec::with_capacity(products.len());
        for product in &products {
            let mut value = to_json(product)?;
            if let Some(fields) = &query.fields {
                project_fields(&mut value, fields);
            }
            out.push(value);
        }
        Ok(out)
    }

    pub async fn update(&self, id: &str, changes: ProductUpdate) -> ApiResult<Product> {
        let id = parse_id(id)?;
        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(title) = changes.title {
            set.insert("slug", slugify(&title));
            set.insert("title", title);
        }
        if let Some(v) = changes.description {
            set.insert("description", v);
        }
        if let Some(v) = changes.price {
            set.insert("price", v);
        }
        if let Some(v) = changes.category {
            set.insert("category", v);
        }
        if let Some(v) = changes.brand {
            set.insert("brand", v);
        }
        if let Some(v) = changes.color {
            set.insert("color", v);
        }
        if let Some(v) = changes.quantity {
            set.insert("quantity", v);
        }
        if let Some(v) = changes.images {
            set.insert("images", v);
        }
        self.repo
            .update_by_id(id, doc! { "$set": set })
            .await?
            .ok_or(ApiError::NotFound("product"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Product> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound("product"))
    }

    /// Toggles the product in the user's wishlist: pull when present, push
    /// when absent. Returns the updated user.
    pub async fn toggle_wishlist(&self, user: &User, prod_id: &str) -> ApiResult<User> {
        let product_id = parse_id(prod_id)?;
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let updated = if user.wishlist.contains(&product_id) {
            self.users.remove_from_set(user_id, "wishlist", product_id.into()).await?
        } else {
            self.users.append_to_set(user_id, "wishlist", product_id.into()).await?
        };
        updated.ok_or(ApiError::NotFound("user"))
    }

    /// Records or replaces the caller's rating, then recomputes the rounded
    /// mean. Read-modify-write: concurrent raters can interleave, which is
    /// accepted for this workload.
    pub async fn rate(&self, user: &User, payload: RatingPayload) -> ApiResult<Product> {
        payload.validate()?;
        let product_id = parse_id(&payload.prod_id)?;
        let user_id = user.id.ok_or(ApiError::NotFound("user"))?;
        let mut product = self
            .repo
            .find_by_id(product_id)
            .await?
            .ok_or(ApiError::NotFound("product"))?;

        match product.ratings.iter_mut().find(|r| r.posted_by == user_id) {
            Some(existing) => {
                existing.star = payload.star;
                existing.comment = payload.comment;
            }
            None => product.ratings.push(Rating {
                star: payload.star,
                comment: payload.comment,
                posted_by: user_id,
            }),
        }
        let total = aggregate_rating(&product.ratings);

        let update: Document = doc! { "$set": {
            "ratings": to_bson(&product.ratings).map_err(crate::store::StoreError::from)?,
            "total_ratings": total,
            "updated_at": DateTime::now(),
        } };
        self.repo
            .update_by_id(product_id, update)
            .await?
            .ok_or(ApiError::NotFound("product"))
    }
}

/// Rounded mean of all star values; zero when nothing is rated yet.
fn aggregate_rating(ratings: &[Rating]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i32 = ratings.iter().map(|r| r.star).sum();
    (f64::from(sum) / ratings.len() as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn rating(star: i32) -> Rating {
        Rating { star, comment: None, posted_by: ObjectId::new() }
    }

    #[test]
    fn aggregate_is_rounded_mean() {
        assert_eq!(aggregate_rating(&[]), 0);
        assert_eq!(aggregate_rating(&[rating(4)]), 4);
        assert_eq!(aggregate_rating(&[rating(4), rating(5)]), 5); // 4.5 rounds up
        assert_eq!(aggregate_rating(&[rating(1), rating(2), rating(2)]), 2);
    }
}
