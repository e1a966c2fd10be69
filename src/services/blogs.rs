//! Blog service: CRUD, view counting, and the mutually exclusive
//! like/dislike toggles.

use std::collections::HashMap;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use serde_json::Value;
use validator::Validate;

use super::{parse_id, to_json};
use crate::error::{ApiError, ApiResult};
use crate::models::blog::{BlogPayload, BlogUpdate};
use crate::models::Blog;
use crate::query::{project_fields, ListQuery};
use crate::slug::slugify;
use crate::store::DynRepository;

#[derive(Clone)]
pub struct BlogService {
    repo: DynRepository<Blog>,
}

impl BlogService {
    pub fn new(repo: DynRepository<Blog>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, payload: BlogPayload) -> ApiResult<Blog> {
        payload.validate()?;
        let now = DateTime::now();
        let blog = Blog {
            id: None,
            slug: slugify(&payload.title),
            title: payload.title,
            description: payload.description,
            category: payload.category,
            num_views: 0,
            is_liked: false,
            is_disliked: false,
            likes: Vec::new(),
            dislikes: Vec::new(),
            images: payload.images,
            author: payload.author.unwrap_or_else(|| "Admin".to_string()),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.insert(blog).await?)
    }

    /// Reading a blog counts as a view; the returned document already
    /// carries the incremented counter.
    pub async fn get(&self, id: &str) -> ApiResult<Blog> {
        let id = parse_id(id)?;
        self.repo
            .increment(id, "num_views", 1)
            .await?
            .ok_or(ApiError::NotFound("blog"))
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> ApiResult<Vec<Value>> {
        let query = ListQuery::parse(params);
        if query.page.is_some() {
            let total = self.repo.count(query.filter.clone()).await?;
            if query.skip() >= total {
                return Err(ApiError::OutOfRange);
            }
        }
        let blogs = self.repo.find(query.find_spec()).await?;
        let mut out = Vec::with_capacity(blogs.len());
        for blog in &blogs {
            let mut value = to_json(blog)?;
            if let Some(fields) = &query.fields {
                project_fields(&mut value, fields);
            }
            out.push(value);
        }
        Ok(out)
    }

    pub async fn update(&self, id: &str, changes: BlogUpdate) -> ApiResult<Blog> {
        let id = parse_id(id)?;
        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(title) = changes.title {
            set.insert("slug", slugify(&title));
            set.insert("title", title);
        }
        if let Some(v) = changes.description {
            set.insert("description", v);
        }
        if let Some(v) = changes.category {
            set.insert("category", v);
        }
        if let Some(v) = changes.author {
            set.insert("author", v);
        }
        if let Some(v) = changes.images {
            set.insert("images", v);
        }
        self.repo
            .update_by_id(id, doc! { "$set": set })
            .await?
            .ok_or(ApiError::NotFound("blog"))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Blog> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound("blog"))
    }

    /// Toggle a like. A previous dislike is cleared first so the caller is
    /// never in both sets.
    pub async fn like(&self, blog_id: &str, user_id: ObjectId) -> ApiResult<Blog> {
        self.react(blog_id, user_id, "likes", "dislikes", "is_liked", "is_disliked").await
    }

    /// Toggle a dislike, symmetric to [`BlogService::like`].
    pub async fn dislike(&self, blog_id: &str, user_id: ObjectId) -> ApiResult<Blog> {
        self.react(blog_id, user_id, "dislikes", "likes", "is_disliked", "is_liked").await
    }

    async fn react(
        &self,
        blog_id: &str,
        user_id: ObjectId,
        target: &str,
        opposite: &str,
        target_flag: &str,
        opposite_flag: &str,
    ) -> ApiResult<Blog> {
        let id = parse_id(blog_id)?;
        let blog = self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound("blog"))?;

        let in_target = membership(&blog, target).contains(&user_id);
        let in_opposite = membership(&blog, opposite).contains(&user_id);

        let mut pull = Document::new();
        let mut set = doc! { "updated_at": DateTime::now() };
        let mut update = Document::new();
        if in_opposite {
            pull.insert(opposite, user_id);
            set.insert(opposite_flag, false);
        }
        if in_target {
            pull.insert(target, user_id);
            set.insert(target_flag, false);
        } else {
            update.insert("$push", doc! { target: user_id });
            set.insert(target_flag, true);
        }
        if !pull.is_empty() {
            update.insert("$pull", pull);
        }
        update.insert("$set", set);

        self.repo.update_by_id(id, update).await?.ok_or(ApiError::NotFound("blog"))
    }
}

fn membership<'a>(blog: &'a Blog, field: &str) -> &'a [ObjectId] {
    if field == "likes" {
        &blog.likes
    } else {
        &blog.dislikes
    }
}
