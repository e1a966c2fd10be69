//! Image storage collaborator.
//!
//! Uploads are resized/stored outside this system's concern; the trait only
//! promises a stable id and a public URL per stored image. The disk
//! implementation keeps files under a configured directory.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub public_id: String,
    pub url: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> ApiResult<StoredImage>;
    async fn delete(&self, public_id: &str) -> ApiResult<()>;
}

pub struct DiskMediaStore {
    root: std::path::PathBuf,
    base_url: String,
}

impl DiskMediaStore {
    pub fn new(root: impl Into<std::path::PathBuf>, base_url: impl Into<String>) -> Self {
        Self { root: root.into(), base_url: base_url.into() }
    }
}

#[async_trait]
impl MediaStore for DiskMediaStore {
    async fn store(&self, filename: &str, bytes: Vec<u8>) -> ApiResult<StoredImage> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let public_id = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ApiError::Upstream(format!("media store unavailable: {e}")))?;
        tokio::fs::write(self.root.join(&public_id), bytes)
            .await
            .map_err(|e| ApiError::Upstream(format!("image write failed: {e}")))?;
        let url = format!("{}/{public_id}", self.base_url.trim_end_matches('/'));
        Ok(StoredImage { public_id, url })
    }

    async fn delete(&self, public_id: &str) -> ApiResult<()> {
        // Refuse anything that could walk out of the media directory.
        if public_id.contains('/') || public_id.contains("..") {
            return Err(ApiError::validation("invalid image id"));
        }
        match tokio::fs::remove_file(self.root.join(public_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound("image")),
            Err(e) => Err(ApiError::Upstream(format!("image delete failed: {e}"))),
        }
    }
}
