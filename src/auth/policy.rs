//! Declarative authorization policy: one table of (resource, action) pairs
//! that require the admin role, consulted by a single `authorize` call
//! instead of per-handler role checks.

use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resource {
    User,
    Product,
    Category,
    Brand,
    Color,
    BlogCategory,
    Blog,
    Coupon,
    Enquiry,
    Order,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    Create,
    Read,
    List,
    Update,
    Delete,
}

/// Role required for an authenticated caller. Routes that are public do not
/// consult the policy at all; everything listed here starts from "logged in".
fn required_role(resource: Resource, action: Action) -> Role {
    use Action::*;
    use Resource::*;
    match (resource, action) {
        // Storefront reads are for everyone.
        (Product | Blog, Read | List) => Role::User,
        // A shopper may open an enquiry; the rest of its lifecycle is staff-side.
        (Enquiry, Create) => Role::User,
        // Everything else on managed resources is back-office.
        (Product | Blog | Category | Brand | Color | BlogCategory | Coupon | Enquiry | Media, _) => Role::Admin,
        // User administration (list, inspect, block, delete) is back-office;
        // self-service profile routes bypass the policy by construction.
        (User, _) => Role::Admin,
        // Own orders are read via Cart routes; the order book is back-office.
        (Order, _) => Role::Admin,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Policy;

impl Policy {
    pub fn authorize(&self, user: &User, resource: Resource, action: Action) -> ApiResult<()> {
        match required_role(resource, action) {
            Role::Admin if !user.is_admin() => {
                Err(ApiError::Forbidden("you are not an admin".to_string()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn user(role: Role) -> User {
        let now = DateTime::now();
        User {
            id: Some(mongodb::bson::oid::ObjectId::new()),
            first_name: "A".into(),
            last_name: "B".into(),
            email: "a@x.com".into(),
            mobile: "1111111111".into(),
            password: String::new(),
            role,
            is_blocked: false,
            address: vec![],
            wishlist: vec![],
            refresh_token: None,
            password_changed_at: None,
            password_reset_token: None,
            password_reset_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn admin_gates_hold() {
        let policy = Policy;
        let shopper = user(Role::User);
        let admin = user(Role::Admin);

        assert!(policy.authorize(&shopper, Resource::Product, Action::Read).is_ok());
        assert!(policy.authorize(&shopper, Resource::Product, Action::Create).is_err());
        assert!(policy.authorize(&shopper, Resource::User, Action::List).is_err());
        assert!(policy.authorize(&shopper, Resource::Enquiry, Action::Create).is_ok());
        assert!(policy.authorize(&shopper, Resource::Coupon, Action::List).is_err());
        assert!(policy.authorize(&admin, Resource::Order, Action::Update).is_ok());
        assert!(policy.authorize(&admin, Resource::Product, Action::Delete).is_ok());
    }
}
