//! Runtime configuration, read from the environment exactly once at startup
//! and passed into the pieces that need it.

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    /// Directory the disk media store writes uploads into.
    pub media_dir: String,
    /// Public base URL prefixed onto stored image paths.
    pub media_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            database_name: std::env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "oxcart".to_string()),
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            media_dir: std::env::var("MEDIA_DIR").unwrap_or_else(|_| "uploads".to_string()),
            media_base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "/images".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
