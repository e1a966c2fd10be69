//! Credential handling: password digests, signed tokens, reset tokens.

pub mod guard;
pub mod policy;

use anyhow::anyhow;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ApiError, ApiResult};

/// Access tokens live for a day, refresh tokens for three.
const ACCESS_TTL_SECS: i64 = 24 * 60 * 60;
const REFRESH_TTL_SECS: i64 = 3 * 24 * 60 * 60;
/// Password-reset tokens are short-lived.
const RESET_TTL_SECS: i64 = 10 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id (hex `ObjectId`).
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued password-reset token. The plain token goes to the user,
/// only the digest is persisted.
pub struct ResetToken {
    pub plain: String,
    pub digest: String,
    pub expires: mongodb::bson::DateTime,
}

pub struct CredentialService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl CredentialService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn hash_password(&self, password: &str) -> ApiResult<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ApiError::Internal(anyhow!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        bcrypt::verify(password, digest).unwrap_or(false)
    }

    pub fn issue_access_token(&self, user_id: ObjectId) -> ApiResult<String> {
        self.sign(user_id, ACCESS_TTL_SECS)
    }

    pub fn issue_refresh_token(&self, user_id: ObjectId) -> ApiResult<String> {
        self.sign(user_id, REFRESH_TTL_SECS)
    }

    fn sign(&self, user_id: ObjectId, ttl_secs: i64) -> ApiResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims { sub: user_id.to_hex(), iat: now, exp: now + ttl_secs };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(anyhow!("token signing failed: {e}")))
    }

    /// Verifies signature and expiry, returning the token's subject.
    pub fn verify_token(&self, token: &str) -> ApiResult<ObjectId> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| ApiError::unauthorized("token expired or invalid, please login again"))?;
        ObjectId::parse_str(&data.claims.sub)
            .map_err(|_| ApiError::unauthorized("token subject is not a valid user id"))
    }

    pub fn issue_reset_token(&self) -> ResetToken {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let plain = hex::encode(bytes);
        let expires_ms = chrono::Utc::now().timestamp_millis() + RESET_TTL_SECS * 1000;
        ResetToken {
            digest: Self::digest_reset_token(&plain),
            plain,
            expires: mongodb::bson::DateTime::from_millis(expires_ms),
        }
    }

    pub fn digest_reset_token(plain: &str) -> String {
        hex::encode(Sha256::digest(plain.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CredentialService {
        CredentialService::new("test-secret")
    }

    #[test]
    fn password_round_trip() {
        let svc = service();
        let digest = svc.hash_password("hunter42").unwrap();
        assert_ne!(digest, "hunter42");
        assert!(svc.verify_password("hunter42", &digest));
        assert!(!svc.verify_password("wrong", &digest));
    }

    #[test]
    fn token_round_trip() {
        let svc = service();
        let id = ObjectId::new();
        let token = svc.issue_access_token(id).unwrap();
        assert_eq!(svc.verify_token(&token).unwrap(), id);
    }

    #[test]
    fn foreign_signature_rejected() {
        let token = service().issue_access_token(ObjectId::new()).unwrap();
        let other = CredentialService::new("other-secret");
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn reset_token_digest_is_stable() {
        let issued = service().issue_reset_token();
        assert_eq!(CredentialService::digest_reset_token(&issued.plain), issued.digest);
        assert_eq!(issued.plain.len(), 64);
    }
}
