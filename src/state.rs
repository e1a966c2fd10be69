//! Shared application state handed to every handler.

use std::sync::Arc;

use mongodb::Database;

use crate::auth::policy::Policy;
use crate::auth::CredentialService;
use crate::media::MediaStore;
use crate::models::catalog::{BlogCategoryKind, BrandKind, CategoryKind, ColorKind};
use crate::models::{
    Blog, BlogCategory, Brand, Cart, Category, Color, Coupon, Enquiry, Order, Product, User,
};
use crate::notify::Mailer;
use crate::services::{
    BlogService, CouponService, EnquiryService, LookupService, ProductService, ShoppingService,
    UserService,
};
use crate::store::mongo::MongoRepository;
use crate::store::DynRepository;

/// One repository handle per collection. Built over mongo in production and
/// over the in-memory store in tests.
pub struct Repositories {
    pub users: DynRepository<User>,
    pub products: DynRepository<Product>,
    pub blogs: DynRepository<Blog>,
    pub categories: DynRepository<Category>,
    pub brands: DynRepository<Brand>,
    pub colors: DynRepository<Color>,
    pub blog_categories: DynRepository<BlogCategory>,
    pub coupons: DynRepository<Coupon>,
    pub enquiries: DynRepository<Enquiry>,
    pub carts: DynRepository<Cart>,
    pub orders: DynRepository<Order>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoRepository::new(db)),
            products: Arc::new(MongoRepository::new(db)),
            blogs: Arc::new(MongoRepository::new(db)),
            categories: Arc::new(MongoRepository::new(db)),
            brands: Arc::new(MongoRepository::new(db)),
            colors: Arc::new(MongoRepository::new(db)),
            blog_categories: Arc::new(MongoRepository::new(db)),
            coupons: Arc::new(MongoRepository::new(db)),
            enquiries: Arc::new(MongoRepository::new(db)),
            carts: Arc::new(MongoRepository::new(db)),
            orders: Arc::new(MongoRepository::new(db)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub products: ProductService,
    pub blogs: BlogService,
    pub categories: LookupService<CategoryKind>,
    pub brands: LookupService<BrandKind>,
    pub colors: LookupService<ColorKind>,
    pub blog_categories: LookupService<BlogCategoryKind>,
    pub coupons: CouponService,
    pub enquiries: EnquiryService,
    pub shopping: ShoppingService,
    pub credentials: Arc<CredentialService>,
    pub policy: Policy,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        credentials: Arc<CredentialService>,
        mailer: Arc<dyn Mailer>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            users: UserService::new(
                repos.users.clone(),
                repos.products.clone(),
                credentials.clone(),
                mailer,
            ),
            products: ProductService::new(repos.products.clone(), repos.users.clone()),
            blogs: BlogService::new(repos.blogs),
            categories: LookupService::new(repos.categories, "category"),
            brands: LookupService::new(repos.brands, "brand"),
            colors: LookupService::new(repos.colors, "color"),
            blog_categories: LookupService::new(repos.blog_categories, "blog category"),
            coupons: CouponService::new(repos.coupons.clone()),
            enquiries: EnquiryService::new(repos.enquiries),
            shopping: ShoppingService::new(
                repos.carts,
                repos.orders,
                repos.products,
                repos.coupons,
                repos.users,
            ),
            credentials,
            policy: Policy,
            media,
        }
    }
}
