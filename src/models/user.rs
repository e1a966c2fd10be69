//! User account document.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    /// bcrypt digest, never the plain password.
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(default)]
    pub wishlist: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_changed_at: Option<DateTime>,
    /// sha256 hex digest of the reset token; the plain token never touches disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_reset_expires: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Entity for User {
    const COLLECTION: &'static str = "users";
    fn id(&self) -> Option<ObjectId> { self.id }
    fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
}

impl User {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, max = 15))]
    pub mobile: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordPayload {
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct AddressPayload {
    pub address: Vec<String>,
}

/// Drops credential material from a serialized user before it leaves the API.
pub fn strip_secrets(value: &mut serde_json::Value) {
    if let serde_json::Value::Object(map) = value {
        for key in [
            "password",
            "refresh_token",
            "password_reset_token",
            "password_reset_expires",
            "password_changed_at",
        ] {
            map.remove(key);
        }
    }
}

/// Login response; mirrors what the storefront needs to greet the user.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub _id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub token: String,
}
