//! Account management: registration, login, token rotation, password
//! lifecycle and the admin-side user operations.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime};
use serde_json::Value;
use validator::Validate;

use super::{parse_id, to_json};
use crate::auth::CredentialService;
use crate::error::{ApiError, ApiResult};
use crate::models::user::{
    AddressPayload, ForgotPasswordPayload, LoginPayload, LoginResponse, ProfileUpdate,
    RegisterPayload,
};
use crate::models::{Product, Role, User};
use crate::notify::Mailer;
use crate::store::{DynRepository, FindSpec};

/// Tokens issued by a successful login.
#[derive(Debug)]
pub struct Session {
    pub response: LoginResponse,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct UserService {
    repo: DynRepository<User>,
    products: DynRepository<Product>,
    credentials: Arc<CredentialService>,
    mailer: Arc<dyn Mailer>,
}

impl UserService {
    pub fn new(
        repo: DynRepository<User>,
        products: DynRepository<Product>,
        credentials: Arc<CredentialService>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self { repo, products, credentials, mailer }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> ApiResult<Option<User>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn register(&self, payload: RegisterPayload) -> ApiResult<User> {
        payload.validate()?;
        if self.repo.find_one(doc! { "email": &payload.email }).await?.is_some() {
            return Err(ApiError::Conflict("user already exists".to_string()));
        }
        let now = DateTime::now();
        let user = User {
            id: None,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            mobile: payload.mobile,
            password: self.credentials.hash_password(&payload.password)?,
            role: Role::User,
            is_blocked: false,
            address: Vec::new(),
            wishlist: Vec::new(),
            refresh_token: None,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
        };
        Ok(self.repo.insert(user).await?)
    }

    /// Shared login path; `admin_only` additionally requires the admin role.
    pub async fn login(&self, payload: LoginPayload, admin_only: bool) -> ApiResult<Session> {
        payload.validate()?;
        let user = self
            .repo
            .find_one(doc! { "email": &payload.email })
            .await?
            .filter(|u| self.credentials.verify_password(&payload.password, &u.password))
            .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;
        if admin_only && !user.is_admin() {
            return Err(ApiError::unauthorized("not an admin"));
        }
        let id = user.id.ok_or_else(|| ApiError::NotFound("user"))?;
        let refresh_token = self.credentials.issue_refresh_token(id)?;
        self.repo
            .update_by_id(
                id,
                doc! { "$set": { "refresh_token": &refresh_token, "updated_at": DateTime::now() } },
            )
            .await?;
        Ok(Session {
            response: LoginResponse {
                _id: id,
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                mobile: user.mobile,
                token: self.credentials.issue_access_token(id)?,
            },
            refresh_token,
        })
    }

    /// Trades a refresh-token cookie for a fresh access token. The stored
    /// refresh token stays as-is.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> ApiResult<String> {
        let user = self
            .repo
            .find_one(doc! { "refresh_token": refresh_token })
            .await?
            .ok_or_else(|| ApiError::unauthorized("no user matches this refresh token"))?;
        let subject = self.credentials.verify_token(refresh_token)?;
        if user.id != Some(subject) {
            return Err(ApiError::unauthorized("refresh token does not belong to its bearer"));
        }
        self.credentials.issue_access_token(subject)
    }

    /// Clears the stored refresh token. Deliberately succeeds even when no
    /// user holds the token, so logout is idempotent.
    pub async fn logout(&self, refresh_token: &str) -> ApiResult<()> {
        self.repo
            .update_one(
                doc! { "refresh_token": refresh_token },
                doc! { "$set": { "refresh_token": Bson::Null } },
            )
            .await?;
        Ok(())
    }

    pub async fn update_profile(&self, id: ObjectId, changes: ProfileUpdate) -> ApiResult<User> {
        let mut set = doc! { "updated_at": DateTime::now() };
        if let Some(v) = changes.first_name {
            set.insert("first_name", v);
        }
        if let Some(v) = changes.last_name {
            set.insert("last_name", v);
        }
        if let Some(v) = changes.email {
            set.insert("email", v);
        }
        if let Some(v) = changes.mobile {
            set.insert("mobile", v);
        }
        self.repo
            .update_by_id(id, doc! { "$set": set })
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    pub async fn save_address(&self, id: ObjectId, payload: AddressPayload) -> ApiResult<User> {
        self.repo
            .update_by_id(
                id,
                doc! { "$set": { "address": payload.address, "updated_at": DateTime::now() } },
            )
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    pub async fn all_users(&self) -> ApiResult<Vec<User>> {
        Ok(self
            .repo
            .find(FindSpec { sort: doc! { "created_at": -1 }, ..FindSpec::default() })
            .await?)
    }

    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or(ApiError::NotFound("user"))
    }

    pub async fn delete_user(&self, id: &str) -> ApiResult<User> {
        let id = parse_id(id)?;
        self.repo.delete_by_id(id).await?.ok_or(ApiError::NotFound("user"))
    }

    pub async fn set_blocked(&self, id: &str, blocked: bool) -> ApiResult<User> {
        let id = parse_id(id)?;
        self.repo
            .update_by_id(
                id,
                doc! { "$set": { "is_blocked": blocked, "updated_at": DateTime::now() } },
            )
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    pub async fn update_password(&self, id: ObjectId, password: &str) -> ApiResult<User> {
        let digest = self.credentials.hash_password(password)?;
        let now = DateTime::now();
        self.repo
            .update_by_id(
                id,
                doc! { "$set": {
                    "password": digest,
                    "password_changed_at": now,
                    "updated_at": now,
                } },
            )
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    /// Issues a reset token, stores its digest + expiry and hands the plain
    /// token to the mailer. The plain token is also returned to the caller.
    pub async fn forgot_password_token(&self, payload: ForgotPasswordPayload) -> ApiResult<String> {
        payload.validate()?;
        let user = self
            .repo
            .find_one(doc! { "email": &payload.email })
            .await?
            .ok_or(ApiError::NotFound("user"))?;
        let id = user.id.ok_or(ApiError::NotFound("user"))?;
        let token = self.credentials.issue_reset_token();
        self.repo
            .update_by_id(
                id,
                doc! { "$set": {
                    "password_reset_token": &token.digest,
                    "password_reset_expires": token.expires,
                    "updated_at": DateTime::now(),
                } },
            )
            .await?;
        self.mailer.send_password_reset(&user.email, &token.plain).await?;
        Ok(token.plain)
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ApiResult<User> {
        let digest = CredentialService::digest_reset_token(token);
        let user = self
            .repo
            .find_one(doc! {
                "password_reset_token": digest,
                "password_reset_expires": { "$gt": DateTime::now() },
            })
            .await?
            .ok_or_else(|| ApiError::validation("token expired, please try again later"))?;
        let id = user.id.ok_or(ApiError::NotFound("user"))?;
        let password = self.credentials.hash_password(password)?;
        let now = DateTime::now();
        self.repo
            .update_by_id(
                id,
                doc! { "$set": {
                    "password": password,
                    "password_changed_at": now,
                    "password_reset_token": Bson::Null,
                    "password_reset_expires": Bson::Null,
                    "updated_at": now,
                } },
            )
            .await?
            .ok_or(ApiError::NotFound("user"))
    }

    /// The user with wishlist product references resolved to documents.
    pub async fn wishlist(&self, user: &User) -> ApiResult<Value> {
        let mut resolved = Vec::with_capacity(user.wishlist.len());
        for product_id in &user.wishlist {
            if let Some(product) = self.products.find_by_id(*product_id).await? {
                resolved.push(to_json(&product)?);
            }
        }
        let mut value = to_json(user)?;
        crate::models::user::strip_secrets(&mut value);
        value["wishlist"] = Value::Array(resolved);
        Ok(value)
    }
}
