//! Shared fixture: the full application state wired over in-memory
//! repositories, so suites exercise the real services end to end.

#![allow(dead_code)]

use std::sync::Arc;

use oxcart::auth::CredentialService;
use oxcart::media::DiskMediaStore;
use oxcart::models::product::ProductPayload;
use oxcart::models::user::RegisterPayload;
use oxcart::models::{Product, User};
use oxcart::notify::LogMailer;
use oxcart::state::{AppState, Repositories};
use oxcart::store::memory::MemoryRepository;

pub fn state() -> AppState {
    let repos = Repositories {
        users: Arc::new(MemoryRepository::new()),
        products: Arc::new(MemoryRepository::new()),
        blogs: Arc::new(MemoryRepository::new()),
        categories: Arc::new(MemoryRepository::new()),
        brands: Arc::new(MemoryRepository::new()),
        colors: Arc::new(MemoryRepository::new()),
        blog_categories: Arc::new(MemoryRepository::new()),
        coupons: Arc::new(MemoryRepository::new()),
        enquiries: Arc::new(MemoryRepository::new()),
        carts: Arc::new(MemoryRepository::new()),
        orders: Arc::new(MemoryRepository::new()),
    };
    AppState::new(
        repos,
        Arc::new(CredentialService::new("test-secret")),
        Arc::new(LogMailer),
        Arc::new(DiskMediaStore::new(std::env::temp_dir().join("oxcart-test-media"), "/images")),
    )
}

pub async fn register(state: &AppState, email: &str) -> User {
    state
        .users
        .register(RegisterPayload {
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            email: email.to_string(),
            mobile: format!("{:0>10}", email.len()),
            password: "password1".to_string(),
        })
        .await
        .expect("registration failed")
}

pub async fn product(state: &AppState, title: &str, price: f64, quantity: i64) -> Product {
    state
        .products
        .create(ProductPayload {
            title: title.to_string(),
            description: "test product".to_string(),
            price,
            category: "gadgets".to_string(),
            brand: "Acme".to_string(),
            color: None,
            quantity,
            images: Vec::new(),
        })
        .await
        .expect("product creation failed")
}
